use super::{ListStacksRequest, StackLister, StackPage};
use crate::error::{Error, Result};

use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudformation::operation::list_stacks::ListStacksOutput;
use aws_sdk_cloudformation::types::StackStatus;
use aws_sdk_cloudformation::Client;
use backoff::ExponentialBackoff;
use std::fmt::Debug;

// Timeouts and throttling are retried with backoff, anything else is returned
// on the first failure.
fn classify<E, R>(name: &'static str, err: SdkError<E, R>) -> backoff::Error<Error>
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: Debug,
{
    let transient = match &err {
        SdkError::TimeoutError(_) => {
            tracing::trace!(%name, "timeout error, retrying");
            true
        }
        _ => match err.as_service_error().and_then(|e| e.code()) {
            Some("Throttling") => {
                tracing::trace!(%name, "throttling error, retrying");
                true
            }
            _ => false,
        },
    };

    let err = Error::Aws(DisplayErrorContext(&err).to_string());
    if transient {
        backoff::Error::transient(err)
    } else {
        backoff::Error::permanent(err)
    }
}

#[async_trait::async_trait]
impl StackLister for Client {
    async fn list_stacks_page(&self, input: ListStacksRequest) -> Result<StackPage> {
        let status_filter = if input.status_filter.is_empty() {
            None
        } else {
            Some(
                input
                    .status_filter
                    .iter()
                    .map(|status| StackStatus::from(status.as_str()))
                    .collect(),
            )
        };

        let builder = Client::list_stacks(self)
            .set_next_token(input.next_token)
            .set_stack_status_filter(status_filter);
        let builder = &builder;

        let output = backoff::future::retry(ExponentialBackoff::default(), move || {
            let request = builder.clone();
            async move {
                request
                    .send()
                    .await
                    .map_err(|e| classify("list_stacks", e))
            }
        })
        .await?;

        Ok(output.into())
    }
}

impl From<ListStacksOutput> for StackPage {
    fn from(o: ListStacksOutput) -> Self {
        Self {
            next_token: o.next_token().map(str::to_owned),
            stack_ids: o
                .stack_summaries()
                .iter()
                .filter_map(|s| s.stack_id())
                .map(str::to_owned)
                .collect(),
        }
    }
}
