// Generates the per-object-type API surface. Every object type served by
// the backend gets the same family of endpoints (load by ID, paginated
// list, random, and for some types a title search), so the methods are
// stamped out from one template. Method names are passed in explicitly
// since macro_rules cannot concatenate identifiers.
macro_rules! object_api {
    (
        $object:literal => $model:ty {
            $(load: $load:ident,)?
            list_page: $list_page:ident,
            list: $list:ident,
            random: $random:ident,
            $(search_page: $search_page:ident, search: $search:ident,)?
        }
    ) => {
        $(
            #[doc = concat!("Loads the `", $object, "` with the given ID.")]
            ///
            /// Returns `Ok(None)` if no such object exists.
            pub fn $load(&self, id: u64) -> Result<Option<$model>> {
                self.load_object($object, id)
            }
        )?

        #[doc = concat!("Fetches a single page of the `", $object, "` list matching the given query.")]
        ///
        /// Most callers want the paginated variant instead, which walks all
        /// pages lazily.
        pub fn $list_page(
            &self,
            page_number: u32,
            page_length: u32,
            query: &ListQuery,
        ) -> Result<Vec<$model>> {
            self.list_object_page($object, page_number, page_length, query)
        }

        #[doc = concat!("Lazily lists all `", $object, "` objects matching the given query.")]
        ///
        /// No request is made until the returned list is iterated.
        pub fn $list(&self, query: ListQuery) -> PaginatedList<'_, $model> {
            self.list_object($object, query)
        }

        #[doc = concat!("Fetches a random `", $object, "`.")]
        pub fn $random(&self) -> Result<$model> {
            self.random_object($object)
        }

        $(
            #[doc = concat!("Fetches a single page of `", $object, "` search results.")]
            ///
            /// The query is matched against the object's title or name.
            pub fn $search_page(
                &self,
                query: &str,
                page_number: u32,
                page_length: u32,
            ) -> Result<Vec<$model>> {
                self.search_object_page($object, query, page_number, page_length)
            }

            #[doc = concat!("Lazily searches `", $object, "` objects by title or name.")]
            pub fn $search(&self, query: &str) -> PaginatedList<'_, $model> {
                self.search_object($object, query)
            }
        )?
    };
}
