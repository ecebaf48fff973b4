/// Fields a conversation query can filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    /// Project name or path (supports ~ and partial matches)
    Project,
    /// Git branch the session was recorded on
    Branch,
    /// Conversations modified on or after a date (YYYY-MM-DD)
    Since,
}

impl FilterField {
    pub const ALL: [FilterField; 3] = [FilterField::Project, FilterField::Branch, FilterField::Since];
}

/// Single field:value filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: FilterField,
    pub value: String,
}

impl FieldFilter {
    pub fn new(field: FilterField, value: String) -> Self {
        Self { field, value }
    }
}

/// Parsed conversation query
///
/// - Filters on the same field are OR'd: `branch:main branch:dev` → (main OR dev)
/// - Filters on different fields are AND'd: `project:app branch:main` → (app AND main)
/// - Every free-text term must appear in the first prompt or the summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpr {
    pub filters: Vec<FieldFilter>,
    pub text_terms: Vec<String>,
}

impl FilterExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_filter(&mut self, filter: FieldFilter) {
        self.filters.push(filter);
    }

    pub fn add_text_term(&mut self, term: String) {
        self.text_terms.push(term);
    }

    /// Filters on one field, in query order
    pub fn filters_for(&self, field: FilterField) -> impl Iterator<Item = &FieldFilter> {
        self.filters.iter().filter(move |filter| filter.field == field)
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.text_terms.is_empty()
    }
}
