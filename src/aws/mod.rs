mod aws_sdk;

use crate::arn::CLOUDFORMATION_STACK;
use crate::error::{Error, Result};
use crate::id::CompositeId;
use crate::paginate::{paginate_until_cancelled, Page, PagedRequest};
use tokio::sync::watch;

#[derive(Debug, Clone, Default)]
pub struct ListStacksRequest {
    pub next_token: Option<String>,
    /// Stack status names such as `CREATE_COMPLETE`; empty lists every stack.
    pub status_filter: Vec<String>,
}

impl PagedRequest for ListStacksRequest {
    fn set_next_token(&mut self, token: Option<String>) {
        self.next_token = token;
    }
}

#[derive(Debug, Clone, Default)]
pub struct StackPage {
    pub next_token: Option<String>,
    pub stack_ids: Vec<String>,
}

impl Page for StackPage {
    fn next_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }
}

/// Trait representing the CloudFormation stack listing
#[async_trait::async_trait]
pub trait StackLister {
    async fn list_stacks_page(&self, input: ListStacksRequest) -> Result<StackPage>;
}

/// List every stack matching `request` and decode its ARN into
/// `stack-name/unique-id`.
pub async fn list_stack_ids<L>(
    lister: &L,
    request: ListStacksRequest,
    cancel: &mut watch::Receiver<bool>,
) -> Result<Vec<CompositeId>>
where
    L: StackLister + ?Sized,
{
    let mut ids = Vec::new();
    let mut malformed: Option<Error> = None;

    paginate_until_cancelled(
        request,
        move |input| lister.list_stacks_page(input),
        |page: StackPage, _| {
            for arn in &page.stack_ids {
                match CLOUDFORMATION_STACK.parse_id(arn) {
                    Ok(id) => ids.push(id),
                    Err(e) => {
                        malformed = Some(e);
                        return false;
                    }
                }
            }
            true
        },
        cancel,
    )
    .await?;

    if let Some(e) = malformed {
        return Err(e);
    }

    tracing::debug!(nstacks = ids.len(), "listed stacks");
    Ok(ids)
}
