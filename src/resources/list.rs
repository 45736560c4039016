//! List facade with page navigation and page-crossing iteration.

use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;

use super::{build_all, Resource};
use crate::client::{Fetched, GtrClient};
use crate::decoder::{Relation, ResourceDecoder};
use crate::error::Result;
use crate::paging::{PaginationParams, Paging};

/// The decoder and paging state of the page currently held.
///
/// Always replaced as a pair.
#[derive(Debug)]
struct PageState {
    decoder: Box<dyn ResourceDecoder>,
    paging: Option<Paging>,
}

/// One page of a list resource, able to move to other pages.
///
/// Navigation methods return `Ok(false)` when the move is not possible
/// (no such cursor, no paging headers, page out of range) and leave the
/// current page untouched. A failed request also leaves it untouched.
pub struct ResourceList<R> {
    client: GtrClient,
    url: String,
    page: PageState,
    _items: PhantomData<fn() -> R>,
}

impl<R> fmt::Debug for ResourceList<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceList")
            .field("url", &self.url)
            .field("paging", &self.page.paging)
            .finish_non_exhaustive()
    }
}

impl<R: Resource> ResourceList<R> {
    pub(crate) fn from_fetch(client: &GtrClient, url: String, fetched: Fetched) -> Result<Self> {
        let page = page_state::<R>(client, &url, fetched)?;
        Ok(Self {
            client: client.clone(),
            url,
            page,
            _items: PhantomData,
        })
    }

    /// Facades for every item on the current page.
    pub fn items(&self) -> Result<Vec<R>> {
        build_all(&self.client, self.page.decoder.subresources(Relation::Items))
    }

    /// Paging state of the current page, if the server sent any.
    pub fn paging(&self) -> Option<&Paging> {
        self.page.paging.as_ref()
    }

    /// Total number of records across all pages.
    pub fn record_count(&self) -> Option<u64> {
        self.paging().map(|p| p.record_count)
    }

    /// Total number of pages.
    pub fn pages(&self) -> Option<u32> {
        self.paging().map(|p| p.pages)
    }

    pub fn current_page(&self) -> Option<u32> {
        self.paging().and_then(Paging::current_page)
    }

    pub fn current_page_size(&self) -> Option<u32> {
        self.paging().and_then(Paging::current_page_size)
    }

    /// The list URL, without paging parameters.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The current page's document as text.
    pub fn render(&self) -> Result<String> {
        self.page.decoder.render()
    }

    pub async fn next_page(&mut self) -> Result<bool> {
        self.follow(|p| p.next.as_deref()).await
    }

    pub async fn previous_page(&mut self) -> Result<bool> {
        self.follow(|p| p.previous.as_deref()).await
    }

    pub async fn first_page(&mut self) -> Result<bool> {
        self.follow(|p| p.first.as_deref()).await
    }

    pub async fn last_page(&mut self) -> Result<bool> {
        self.follow(|p| p.last.as_deref()).await
    }

    /// Jump to page `page` (1-indexed), keeping the current page size.
    ///
    /// Returns `Ok(false)` unless `1 <= page <= pages`.
    #[tracing::instrument(skip(self))]
    pub async fn skip_to_page(&mut self, page: u32) -> Result<bool> {
        let Some(params) = page_params(self.paging(), page) else {
            return Ok(false);
        };
        let url = self.url.clone();
        self.load(&url, params).await?;
        Ok(true)
    }

    /// Iterate over items, crossing page boundaries as configured.
    pub fn iter(&mut self, options: IterOptions) -> ListIter<'_, R> {
        ListIter {
            list: self,
            options,
            buffer: VecDeque::new(),
            started: false,
            finished: false,
        }
    }

    /// Walk every page from the first and collect all items.
    pub async fn collect_all(&mut self) -> Result<Vec<R>> {
        let mut iter = self.iter(IterOptions::default());
        let mut items = Vec::new();
        while let Some(item) = iter.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    async fn follow(&mut self, cursor: impl Fn(&Paging) -> Option<&str>) -> Result<bool> {
        let Some(target) = cursor_target(self.paging(), cursor) else {
            return Ok(false);
        };

        self.load(&target, PaginationParams::default()).await?;
        Ok(true)
    }

    async fn load(&mut self, url: &str, params: PaginationParams) -> Result<()> {
        let fetched = self.client.fetch(url, params).await?;
        self.page = page_state::<R>(&self.client, url, fetched)?;
        tracing::debug!(page = ?self.current_page(), pages = ?self.pages(), "moved to page");
        Ok(())
    }
}

/// The non-blank cursor URL selected from `paging`, if any.
pub(super) fn cursor_target(
    paging: Option<&Paging>,
    cursor: impl Fn(&Paging) -> Option<&str>,
) -> Option<String> {
    paging
        .and_then(cursor)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// Params for jumping to `page`, keeping the current page size, or `None`
/// unless `1 <= page <= pages`.
pub(super) fn page_params(paging: Option<&Paging>, page: u32) -> Option<PaginationParams> {
    let paging = paging?;
    if page < 1 || page > paging.pages {
        return None;
    }
    Some(PaginationParams::new(Some(page), paging.current_page_size()))
}

fn page_state<R: Resource>(client: &GtrClient, url: &str, fetched: Fetched) -> Result<PageState> {
    if fetched.paging.is_none() {
        tracing::warn!(%url, "list response carried no paging headers");
    }
    Ok(PageState {
        decoder: client.decoder(R::LIST_KIND, fetched.body)?,
        paging: fetched.paging,
    })
}

/// How a [`ListIter`] walks the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterOptions {
    /// Go back to the first page before yielding anything.
    pub reset_pages: bool,
    /// Stop at the end of the starting page instead of following `next`.
    pub stop_at_page_boundary: bool,
}

impl Default for IterOptions {
    fn default() -> Self {
        Self {
            reset_pages: true,
            stop_at_page_boundary: false,
        }
    }
}

/// Lazy, forward-only iterator over a list's items.
///
/// Pages are fetched only when the items of the previous page have all
/// been yielded. The list it borrows moves with it.
#[derive(Debug)]
pub struct ListIter<'a, R> {
    list: &'a mut ResourceList<R>,
    options: IterOptions,
    buffer: VecDeque<R>,
    started: bool,
    finished: bool,
}

impl<R: Resource> ListIter<'_, R> {
    /// The next item, or `None` once the last page is exhausted.
    pub async fn next(&mut self) -> Result<Option<R>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }
            if self.finished {
                return Ok(None);
            }

            if !self.started {
                self.started = true;
                if self.options.reset_pages {
                    self.list.first_page().await?;
                }
            } else if self.options.stop_at_page_boundary || !self.list.next_page().await? {
                self.finished = true;
                continue;
            }

            self.buffer.extend(self.list.items()?);
        }
    }
}
