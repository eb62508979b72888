//! Module containing the query builder for list and search requests

use crate::{
    api::condition::{Condition, Scalar},
    error::{Error, Result},
};

/// Hard ceiling the API imposes on the page length of list and search
/// requests. Requests asking for more get truncated server-side, so the
/// builder rejects them up front instead.
pub const MAX_PAGE_LENGTH: u32 = 500;

/// How the parameters of a list request travel over the wire.
///
/// ## BotB internals:
/// Plain filtered lists are GETs with the filters collapsed into a single
/// caret-joined `filters=k~v^k2~v2` query parameter. As soon as conditions
/// are involved the request becomes a POST with a urlencoded form body,
/// and the two styles cannot be mixed in one request.
#[derive(Debug, Clone, PartialEq)]
pub enum PageBody {
    /// GET request; the parameters belong in the URL query string.
    Query(Vec<(String, String)>),
    /// POST request; the parameters belong in a urlencoded form body.
    Form(Vec<(String, String)>),
}

/// Builder for the parameters of a single list or search page.
///
/// The builder is freely cloneable so the pagination layer can re-issue it
/// once per page with only the page index changing.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    desc: bool,
    sort: Option<String>,
    filters: Vec<(String, Scalar)>,
    conditions: Vec<Condition>,
}

impl ListQuery {
    pub fn new() -> ListQuery {
        ListQuery::default()
    }

    /// Sorts results by the given object property.
    pub fn sort(mut self, property: impl Into<String>) -> ListQuery {
        self.sort = Some(property.into());
        self
    }

    /// Like [`ListQuery::sort`], but keeps an already configured sort key.
    pub fn default_sort(mut self, property: impl Into<String>) -> ListQuery {
        if self.sort.is_none() {
            self.sort = Some(property.into());
        }
        self
    }

    /// Reverses the sort order. Only valid together with [`ListQuery::sort`].
    pub fn desc(mut self, desc: bool) -> ListQuery {
        self.desc = desc;
        self
    }

    /// Adds an exact-or-substring filter on an object property.
    ///
    /// ## BotB internals:
    /// Filters are sugar for conditions: numeric values (integers, or strings
    /// of digits) compare with `=`, everything else with `LIKE`. They are
    /// prepended to any explicitly added conditions in encoding order.
    pub fn filter(mut self, property: impl Into<String>, value: impl Into<Scalar>) -> ListQuery {
        self.filters.push((property.into(), value.into()));
        self
    }

    /// Adds a structured condition.
    pub fn condition(mut self, condition: Condition) -> ListQuery {
        self.conditions.push(condition);
        self
    }

    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    /// Serializes this query for a page request of the given length,
    /// selecting the GET or POST wire form depending on whether conditions
    /// are present. Page number and page length travel in the URL path, not
    /// here.
    pub fn build(&self, page_length: u32, ceiling: u32) -> Result<PageBody> {
        if self.desc && self.sort.is_none() {
            return Err(Error::InvalidQuery(
                "desc option requires a sort key".to_string(),
            ));
        }

        if page_length < 1 || page_length > ceiling {
            return Err(Error::InvalidQuery(format!(
                "page length must be between 1 and {}, got {}",
                ceiling, page_length
            )));
        }

        let mut params = Vec::new();

        if self.has_conditions() {
            for (index, condition) in self.normalized_conditions().iter().enumerate() {
                condition.encode_into(index, &mut params)?;
            }
        }

        if self.desc {
            params.push(("desc".to_string(), "true".to_string()));
        }

        if let Some(sort) = &self.sort {
            params.push(("sort".to_string(), sort.clone()));
        }

        if self.has_conditions() {
            Ok(PageBody::Form(params))
        } else {
            if !self.filters.is_empty() {
                let joined = self
                    .filters
                    .iter()
                    .map(|(property, value)| format!("{}~{}", property, value))
                    .collect::<Vec<_>>()
                    .join("^");

                params.push(("filters".to_string(), joined));
            }

            Ok(PageBody::Query(params))
        }
    }

    /// Rewrites filters as conditions and prepends them to the explicit ones.
    fn normalized_conditions(&self) -> Vec<Condition> {
        self.filters
            .iter()
            .map(|(property, value)| {
                let operator = if value.is_numeric() { "=" } else { "LIKE" };

                Condition::new(property.clone(), operator, value.clone())
            })
            .chain(self.conditions.iter().cloned())
            .collect()
    }
}
