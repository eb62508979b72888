//! Module containing the lazy cursor that drives paginated list requests
//!
//! ## BotB internals:
//! The list and search APIs are paged by `page_number` and `page_length`,
//! where a page request addresses rows `page_number * page_length` onwards.
//! The backend does not report a total count anywhere, so the only way to
//! detect the end of the data is a *short* page (fewer rows than requested)
//! or an empty one. The cursor below turns that protocol into an ordinary
//! [`Iterator`], fetching pages on demand and never more than one ahead.

use crate::error::Result;
use log::{debug, trace};
use std::{
    collections::VecDeque,
    fmt::{Debug, Formatter},
};

/// A lazily fetched, paginated sequence of objects.
///
/// Constructing one performs no I/O; pages are only requested once the list
/// is iterated, via [`PaginatedList::iter`] or a `for` loop over `&mut list`.
/// Iteration is single-pass and forward-only. Iterating a second time starts
/// over from the beginning (or the configured offset) with fresh fetches, it
/// does not resume where the previous pass stopped.
///
/// The page length is fixed for the whole iteration: rows are addressed by
/// `page_number * page_length`, so changing the length between pages would
/// re-read rows that were already yielded. With a `max_items` cap the last
/// page may therefore contain more rows than are still needed; the surplus
/// is discarded client-side.
pub struct PaginatedList<'f, T> {
    fetch: Box<dyn FnMut(u32, u32) -> Result<Vec<T>> + 'f>,
    max_items: u32,
    offset: u32,
    page_ceiling: u32,
}

impl<'f, T> PaginatedList<'f, T> {
    /// Creates a list backed by the given page-fetch function. The function
    /// receives `(page_number, page_length)` and returns the rows of that
    /// page, possibly fewer than requested, possibly none.
    pub fn new(fetch: impl FnMut(u32, u32) -> Result<Vec<T>> + 'f) -> PaginatedList<'f, T> {
        PaginatedList {
            fetch: Box::new(fetch),
            max_items: 0,
            offset: 0,
            page_ceiling: super::query::MAX_PAGE_LENGTH,
        }
    }

    /// Caps the total number of items yielded. `0` means no limit (it never
    /// means "yield nothing").
    pub fn max_items(mut self, max_items: u32) -> PaginatedList<'f, T> {
        self.max_items = max_items;
        self
    }

    /// Skips the first `offset` items of the sequence.
    ///
    /// Skipping happens by page arithmetic: the first fetch already targets
    /// page `offset / page_length`, earlier pages are never requested.
    pub fn offset(mut self, offset: u32) -> PaginatedList<'f, T> {
        self.offset = offset;
        self
    }

    /// Overrides the maximum page length the backend accepts.
    pub fn page_ceiling(mut self, ceiling: u32) -> PaginatedList<'f, T> {
        self.page_ceiling = ceiling;
        self
    }

    /// Begins (or restarts) iteration over the sequence.
    pub fn iter(&mut self) -> Cursor<'_, 'f, T> {
        Cursor {
            state: CursorState {
                primed: false,
                done: false,
                count: 0,
                page: 0,
                page_length: 0,
                received: 0,
                buffer: VecDeque::new(),
            },
            list: self,
        }
    }

    /// Drains the whole sequence into a [`Vec`], stopping at the first error.
    pub fn try_collect(&mut self) -> Result<Vec<T>> {
        self.iter().collect()
    }
}

impl<'c, 'f, T> IntoIterator for &'c mut PaginatedList<'f, T> {
    type IntoIter = Cursor<'c, 'f, T>;
    type Item = Result<T>;

    fn into_iter(self) -> Cursor<'c, 'f, T> {
        self.iter()
    }
}

impl<T> Debug for PaginatedList<'_, T> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("PaginatedList")
            .field("max_items", &self.max_items)
            .field("offset", &self.offset)
            .field("page_ceiling", &self.page_ceiling)
            .finish_non_exhaustive()
    }
}

/// Iteration state: which page is buffered, how far consumption has
/// progressed, and whether the end (or an error) has been reached.
struct CursorState<T> {
    primed: bool,
    done: bool,

    /// Absolute position in the full sequence. Starts at `offset`, so a
    /// `max_items` cap bounds the absolute position, not the yielded count.
    count: u64,

    page: u32,
    page_length: u32,

    /// Length of the most recently fetched page, before any items were
    /// consumed from it. A value below `page_length` proves end-of-data.
    received: usize,

    buffer: VecDeque<T>,
}

/// A single pass over a [`PaginatedList`].
///
/// Yields `Result<T>`; a transport or query error is yielded once and ends
/// the pass (the cursor is poisoned, further `next` calls return `None`).
/// Not safe to share across threads without external synchronization.
pub struct Cursor<'c, 'f, T> {
    list: &'c mut PaginatedList<'f, T>,
    state: CursorState<T>,
}

impl<T> Cursor<'_, '_, T> {
    /// Computes the fixed page length and starting page for this pass and
    /// fetches the first page, discarding any in-page items the offset says
    /// to skip.
    fn prime(&mut self) -> Result<()> {
        self.state.primed = true;

        let page_length = if self.list.max_items > 0 {
            self.list.max_items.min(self.list.page_ceiling)
        } else {
            self.list.page_ceiling
        };

        self.state.page_length = page_length;
        self.state.count = u64::from(self.list.offset);

        if self.list.max_items > 0 && self.list.offset >= self.list.max_items {
            // The offset alone already exhausts the cap, no fetch needed
            self.state.done = true;

            return Ok(())
        }

        self.state.page = self.list.offset / page_length;

        let skip = (self.list.offset % page_length) as usize;

        self.fetch_page()?;
        self.state.buffer.drain(..skip.min(self.state.buffer.len()));

        Ok(())
    }

    fn fetch_page(&mut self) -> Result<()> {
        trace!(
            "Requesting page {} with page length {}",
            self.state.page,
            self.state.page_length
        );

        let items = (self.list.fetch)(self.state.page, self.state.page_length)?;

        self.state.received = items.len();
        self.state.buffer = items.into();

        Ok(())
    }
}

impl<T> Iterator for Cursor<'_, '_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        if self.state.done {
            return None
        }

        if !self.state.primed {
            if let Err(why) = self.prime() {
                self.state.done = true;

                return Some(Err(why))
            }
        }

        loop {
            let capped = self.list.max_items > 0 && self.state.count >= u64::from(self.list.max_items);

            if self.state.done || capped || self.state.received == 0 {
                self.state.done = true;

                return None
            }

            if let Some(item) = self.state.buffer.pop_front() {
                self.state.count += 1;

                return Some(Ok(item))
            }

            if self.state.received < self.state.page_length as usize {
                // A short page is definitive, the next one would be empty
                debug!("Page {} was short, ending iteration", self.state.page);

                self.state.done = true;

                return None
            }

            self.state.page += 1;

            if let Err(why) = self.fetch_page() {
                self.state.done = true;

                return Some(Err(why))
            }
        }
    }
}

impl<T> Debug for Cursor<'_, '_, T> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("count", &self.state.count)
            .field("page", &self.state.page)
            .field("done", &self.state.done)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::PaginatedList;
    use crate::error::Error;
    use std::cell::RefCell;

    /// Page-addressed fake backend over `data`, recording every
    /// `(page_number, page_length)` request it receives.
    fn backend<'a>(data: &'a [u32], requests: &'a RefCell<Vec<(u32, u32)>>) -> PaginatedList<'a, u32> {
        PaginatedList::new(move |page, page_length| {
            requests.borrow_mut().push((page, page_length));

            let start = page as usize * page_length as usize;
            let end = (start + page_length as usize).min(data.len());

            Ok(data.get(start..end).map(<[u32]>::to_vec).unwrap_or_default())
        })
    }

    fn dataset(len: u32) -> Vec<u32> {
        (0..len).collect()
    }

    #[test]
    fn yields_everything_in_order_and_stops_on_the_short_page() {
        let data = dataset(530);
        let requests = RefCell::new(Vec::new());

        let items: Vec<u32> = backend(&data, &requests)
            .page_ceiling(250)
            .try_collect()
            .unwrap();

        assert_eq!(items, data);
        assert_eq!(*requests.borrow(), vec![(0, 250), (1, 250), (2, 250)]);
    }

    #[test]
    fn exact_page_multiple_needs_one_extra_empty_fetch() {
        let data = dataset(1000);
        let requests = RefCell::new(Vec::new());

        let items = backend(&data, &requests).try_collect().unwrap();

        assert_eq!(items.len(), 1000);
        // 1000 is an exact multiple of 500, so only an empty page 2 proves
        // that page 1 was the last one
        assert_eq!(requests.borrow().len(), 3);
        assert_eq!(requests.borrow()[2], (2, 500));
    }

    #[test]
    fn small_max_items_is_served_by_one_exactly_sized_fetch() {
        let data = dataset(530);
        let requests = RefCell::new(Vec::new());

        let items = backend(&data, &requests)
            .page_ceiling(250)
            .max_items(50)
            .try_collect()
            .unwrap();

        assert_eq!(items, dataset(50));
        assert_eq!(*requests.borrow(), vec![(0, 50)]);
    }

    #[test]
    fn max_items_beyond_the_data_is_capped_by_the_data() {
        let data = dataset(530);
        let requests = RefCell::new(Vec::new());

        let items = backend(&data, &requests)
            .page_ceiling(250)
            .max_items(600)
            .try_collect()
            .unwrap();

        assert_eq!(items, data);
        assert_eq!(requests.borrow().len(), 3);
    }

    #[test]
    fn max_items_zero_means_no_limit() {
        let data = dataset(7);
        let requests = RefCell::new(Vec::new());

        let items = backend(&data, &requests).max_items(0).try_collect().unwrap();

        assert_eq!(items.len(), 7);
    }

    #[test]
    fn offset_skips_by_page_arithmetic_not_by_discarding() {
        let data = dataset(530);
        let requests = RefCell::new(Vec::new());

        let items = backend(&data, &requests)
            .page_ceiling(100)
            .offset(250)
            .try_collect()
            .unwrap();

        assert_eq!(items, (250..530).collect::<Vec<u32>>());
        // The first request targets page 2 directly; pages 0 and 1 are
        // never fetched
        assert_eq!(requests.borrow()[0], (2, 100));
    }

    #[test]
    fn offset_counts_against_max_items() {
        let data = dataset(530);
        let requests = RefCell::new(Vec::new());

        let items = backend(&data, &requests)
            .page_ceiling(100)
            .offset(90)
            .max_items(100)
            .try_collect()
            .unwrap();

        // max_items caps the absolute position, so offset 90 with a cap of
        // 100 leaves items 90 through 99
        assert_eq!(items, (90..100).collect::<Vec<u32>>());
        assert_eq!(*requests.borrow(), vec![(0, 100)]);
    }

    #[test]
    fn offset_beyond_the_data_yields_nothing() {
        let data = dataset(530);
        let requests = RefCell::new(Vec::new());

        let items = backend(&data, &requests)
            .page_ceiling(250)
            .offset(600)
            .try_collect()
            .unwrap();

        assert!(items.is_empty());
        assert_eq!(requests.borrow().len(), 1);
    }

    #[test]
    fn empty_dataset_is_one_fetch_and_no_error() {
        let data = dataset(0);
        let requests = RefCell::new(Vec::new());

        let items = backend(&data, &requests).try_collect().unwrap();

        assert!(items.is_empty());
        assert_eq!(requests.borrow().len(), 1);
    }

    #[test]
    fn constructing_performs_no_io() {
        let data = dataset(10);
        let requests = RefCell::new(Vec::new());

        let _list = backend(&data, &requests).max_items(5).offset(2);

        assert!(requests.borrow().is_empty());
    }

    #[test]
    fn reiterating_starts_over_with_fresh_fetches() {
        let data = dataset(30);
        let requests = RefCell::new(Vec::new());

        let mut list = backend(&data, &requests).page_ceiling(25);

        let first = list.try_collect().unwrap();
        let second = list.try_collect().unwrap();

        assert_eq!(first, second);
        assert_eq!(*requests.borrow(), vec![(0, 25), (1, 25), (0, 25), (1, 25)]);
    }

    #[test]
    fn an_error_poisons_the_cursor() {
        let requests = RefCell::new(0u32);

        let mut list = PaginatedList::new(|page, page_length| {
            *requests.borrow_mut() += 1;

            match page {
                0 => Ok((0..page_length).collect::<Vec<u32>>()),
                _ => Err(Error::http(502, "bad gateway")),
            }
        })
        .page_ceiling(25);

        let mut cursor = list.iter();

        for expected in 0..25 {
            assert_eq!(cursor.next().unwrap().unwrap(), expected);
        }

        assert!(matches!(cursor.next(), Some(Err(Error::ConnectionFailure { .. }))));
        assert!(cursor.next().is_none());
        assert!(cursor.next().is_none());
        assert_eq!(*requests.borrow(), 2);
    }
}
