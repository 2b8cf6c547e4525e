/// Runtime parameters handed to where-clause templates.
///
/// Every field is optional. Templates that depend on an absent parameter leave their constraint
/// out instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// The requested language, e.g. `en`.
    pub language: Option<String>,
    /// The identifier of the entity a query is about, as a full IRI.
    pub id: Option<String>,
    /// A category restricting the results, e.g. a vocabulary scheme.
    pub category: Option<String>,
    /// Comma separated list of start years, as sent by the timeline.
    pub date: Option<String>,
    /// Lower year bound.
    pub from: Option<String>,
    /// Upper year bound.
    pub to: Option<String>,
    /// Width of a timeline bucket in years.
    pub interval: Option<u32>,
}

impl QueryParams {
    /// The interval used when none is given.
    pub const DEFAULT_INTERVAL: u32 = 20;

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Returns the interval, falling back to [`Self::DEFAULT_INTERVAL`] when it is absent or zero.
    pub fn interval_or_default(&self) -> u32 {
        match self.interval {
            Some(interval) if interval > 0 => interval,
            _ => Self::DEFAULT_INTERVAL,
        }
    }

    /// Returns the start years listed in `date`, skipping everything that is not an integer.
    pub fn start_years(&self) -> Vec<i32> {
        self.date
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(|year| year.trim().parse().ok())
            .collect()
    }

    /// Returns `from` and `to` parsed as years.
    pub fn year_bounds(&self) -> (Option<i32>, Option<i32>) {
        let parse = |year: &Option<String>| year.as_deref().and_then(|y| y.trim().parse().ok());
        (parse(&self.from), parse(&self.to))
    }
}
