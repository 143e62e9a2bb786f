use arnpager::arn::CLOUDFORMATION_STACK;
use arnpager::aws::{list_stack_ids, ListStacksRequest};
use aws_config::BehaviorVersion;
use aws_sdk_cloudformation::Client;
use tokio::sync::watch;

// Talks to the real CloudFormation API with the ambient AWS credentials:
// `cargo test -- --ignored`
#[tokio::test]
#[ignore]
async fn lists_live_stacks() {
    let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
    let client = Client::new(&config);
    let (_tx, mut rx) = watch::channel(false);

    let request = ListStacksRequest {
        status_filter: vec!["CREATE_COMPLETE".to_string(), "UPDATE_COMPLETE".to_string()],
        ..Default::default()
    };
    let ids = list_stack_ids(&client, request, &mut rx).await.unwrap();

    let region = config.region().map(|r| r.to_string()).unwrap_or_default();
    for id in &ids {
        let arn = CLOUDFORMATION_STACK.qualified_name("aws", &region, "000000000000", id);
        assert_eq!(CLOUDFORMATION_STACK.parse_id(&arn).unwrap(), *id);
    }
}
