//! Drive paged list APIs to completion by following continuation tokens.

use std::future::Future;
use tokio::sync::watch;
use tracing::Instrument;

/// A list request whose continuation token can be replaced between calls.
pub trait PagedRequest {
    fn set_next_token(&mut self, token: Option<String>);
}

/// One page of a list response. An absent or empty token marks the last page.
pub trait Page {
    fn next_token(&self) -> Option<&str>;
}

/// Returned through `E::from` when a cancellable pagination is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Fetch pages until the last one, or until `visit` returns `false`.
///
/// `visit` receives every page together with whether it is the last one. The
/// first fetch error is returned as-is and ends the pagination.
pub async fn paginate<R, P, E, F, Fut, V>(request: R, fetch: F, visit: V) -> Result<(), E>
where
    R: PagedRequest + Clone,
    P: Page,
    F: FnMut(R) -> Fut,
    Fut: Future<Output = Result<P, E>>,
    V: FnMut(P, bool) -> bool,
{
    drive(request, fetch, visit, None::<(&mut watch::Receiver<bool>, fn() -> E)>).await
}

/// Like [`paginate`], but stops with `Cancelled` once `cancel` reads `true`.
///
/// The flag is checked before every fetch and an in-flight fetch is abandoned
/// when it flips. A dropped sender never cancels.
pub async fn paginate_until_cancelled<R, P, E, F, Fut, V>(
    request: R,
    fetch: F,
    visit: V,
    cancel: &mut watch::Receiver<bool>,
) -> Result<(), E>
where
    R: PagedRequest + Clone,
    P: Page,
    E: From<Cancelled>,
    F: FnMut(R) -> Fut,
    Fut: Future<Output = Result<P, E>>,
    V: FnMut(P, bool) -> bool,
{
    drive(request, fetch, visit, Some((cancel, || E::from(Cancelled)))).await
}

async fn drive<R, P, E, F, Fut, V, C>(
    mut request: R,
    mut fetch: F,
    mut visit: V,
    mut cancel: Option<(&mut watch::Receiver<bool>, C)>,
) -> Result<(), E>
where
    R: PagedRequest + Clone,
    P: Page,
    F: FnMut(R) -> Fut,
    Fut: Future<Output = Result<P, E>>,
    V: FnMut(P, bool) -> bool,
    C: Fn() -> E,
{
    let mut page_number = 0usize;
    loop {
        page_number += 1;
        let page = match cancel.as_mut() {
            Some((rx, on_cancel)) => {
                if *rx.borrow() {
                    tracing::debug!(page_number, "pagination cancelled");
                    return Err(on_cancel());
                }
                let call = fetch(request.clone())
                    .instrument(tracing::debug_span!("fetch page", page_number));
                tokio::select! {
                    biased;
                    _ = cancelled(rx) => {
                        tracing::debug!(page_number, "pagination cancelled during fetch");
                        return Err(on_cancel());
                    }
                    page = call => page?,
                }
            }
            None => {
                fetch(request.clone())
                    .instrument(tracing::debug_span!("fetch page", page_number))
                    .await?
            }
        };

        let next_token = page
            .next_token()
            .filter(|token| !token.is_empty())
            .map(str::to_owned);
        let last_page = next_token.is_none();
        tracing::trace!(page_number, next_token = ?next_token, last_page, "got page");

        if !visit(page, last_page) || last_page {
            break;
        }

        request.set_next_token(next_token);
    }
    Ok(())
}

async fn cancelled(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}
