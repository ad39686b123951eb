//! Shared types and streaming infrastructure for the YouTube API client.

use crate::youtube_api::client::{ListRequest, YouTubeApi};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};
use tokio_stream::{Stream, StreamExt};

type OneFuturePage<'a, F, T> =
    Pin<Box<dyn Future<Output = eyre::Result<(F, (VecDeque<T>, Option<ListRequest>))>> + 'a + Send>>;

/// A paginated stream that automatically fetches subsequent pages from a YouTube API list endpoint.
///
/// This stream yields items one by one, automatically fetching the next page when the current
/// page is exhausted. Each page's fetcher returns the request for the page after it, or `None`
/// once the listing is complete. The stream is not restartable, and ends after the first error
/// it yields.
pub struct PagedStream<'a, T, F> {
    /// Current batch of items from the most recent API response
    current_items: VecDeque<T>,
    /// Future representing the currently pending API request, if any
    pending_request: Option<OneFuturePage<'a, F, T>>,
    /// Whether we've reached the end of all available data
    is_done: bool,
}

impl<'a, T, F> PagedStream<'a, T, F> {
    /// Create a new PagedStream that starts by executing `first`.
    pub fn new<Fut>(first: ListRequest, fetcher: F) -> Self
    where
        F: Fn(ListRequest) -> Fut,
        F: Send + 'a,
        Fut: Future<Output = eyre::Result<(VecDeque<T>, Option<ListRequest>)>> + Send + 'a,
    {
        let first_page = async move {
            let results = fetcher(first).await?;
            Ok::<_, eyre::Report>((fetcher, results))
        };
        Self {
            pending_request: Some(Box::pin(first_page)),
            current_items: VecDeque::new(),
            is_done: false,
        }
    }
}

impl<'a, T: Unpin, F> Unpin for PagedStream<'a, T, F> {}

impl<'a, T: Unpin, F, Fut> Stream for PagedStream<'a, T, F>
where
    F: Fn(ListRequest) -> Fut,
    F: Send + 'a,
    Fut: Future<Output = eyre::Result<(VecDeque<T>, Option<ListRequest>)>> + Send + 'a,
{
    type Item = eyre::Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(item) = self.current_items.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            if self.is_done {
                return Poll::Ready(None);
            }

            let Some(pending) = self.pending_request.as_mut() else {
                self.is_done = true;
                return Poll::Ready(None);
            };

            match pending.as_mut().poll(cx) {
                Poll::Ready(Ok((fetcher, (items, next_request)))) => {
                    self.current_items.extend(items);

                    if let Some(next_request) = next_request {
                        // set up the next page, but don't poll it until this one is drained
                        self.pending_request = Some(Box::pin(async move {
                            let results = fetcher(next_request).await?;
                            Ok::<_, eyre::Report>((fetcher, results))
                        }));
                    } else {
                        self.is_done = true;
                        self.pending_request = None;
                    }
                }
                Poll::Ready(Err(e)) => {
                    self.pending_request = None;
                    self.is_done = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Walks a list endpoint page by page, yielding the raw JSON items of every page.
///
/// The next page is requested through [`YouTubeApi::list_next`], so the walk ends when a
/// response carries no `nextPageToken`.
pub fn paginate<'a, A: YouTubeApi>(
    api: &'a A,
    first: ListRequest,
) -> impl Stream<Item = eyre::Result<Value>> + 'a {
    PagedStream::new(first, move |request: ListRequest| async move {
        let mut response = api.list(&request).await?;
        let next_request = api.list_next(&request, &response);
        let items = take_items(&mut response, &request)?;

        tracing::debug!(
            resource = %request.resource,
            returned_items = items.len(),
            has_next_page = next_request.is_some(),
            "fetched page"
        );

        Ok::<_, eyre::Report>((VecDeque::from(items), next_request))
    })
}

/// Moves the `items` array out of a list response.
pub fn take_items(response: &mut Value, request: &ListRequest) -> eyre::Result<Vec<Value>> {
    match response.get_mut("items").map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(eyre::eyre!(
            "{} response has non-array items: {}",
            request.resource,
            other
        )),
        None => Err(eyre::eyre!("{} response has no items", request.resource)),
    }
}

/// The outcome of walking a paginated listing.
///
/// Pagination is best-effort: a failed page ends the walk and the items gathered up to that
/// point are kept. `complete` tells the two endings apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// `false` if the walk was cut short by an error.
    pub complete: bool,
}

impl<T> Paginated<T> {
    /// Drains `stream`, keeping what `select` picks out of each raw item.
    ///
    /// `select` returns `Ok(None)` for items of a kind we don't want. An error from either the
    /// stream or `select` is logged and stops the walk.
    pub async fn collect<U, S>(
        stream: S,
        mut select: impl FnMut(U) -> eyre::Result<Option<T>>,
    ) -> Self
    where
        S: Stream<Item = eyre::Result<U>>,
    {
        let mut stream = std::pin::pin!(stream);
        let mut items = Vec::new();
        while let Some(item) = stream.next().await {
            match item.and_then(&mut select) {
                Ok(Some(item)) => items.push(item),
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(
                        error = ?e,
                        kept_items = items.len(),
                        "pagination aborted, keeping partial results"
                    );
                    return Self {
                        items,
                        complete: false,
                    };
                }
            }
        }
        Self {
            items,
            complete: true,
        }
    }
}

/// Deserializes a count that may arrive as a JSON number or a JSON string into its text form.
///
/// Comment like counts come back as numbers and video statistics as strings; both end up as
/// decimal text in our tables.
pub(crate) fn count_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    Ok(match Count::deserialize(deserializer)? {
        Count::Number(n) => n.to_string(),
        Count::Text(s) => s,
    })
}
