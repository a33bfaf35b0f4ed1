//! Read-only content sections of the public site: load every row of one
//! table, optionally filter by category, optionally open one item.
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::store::{ContentStore, Order, Query, StoreError, Table, from_rows};

pub trait Section: Serialize + DeserializeOwned + Clone + Send + Sync {
    const TABLE: Table;

    fn order() -> Option<Order> {
        None
    }

    fn category(&self) -> Option<&str> {
        None
    }
}

/// Category filter. `All` is the sentinel shown as "Semua" on the site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Category {
    #[default]
    All,
    Named(String),
}

impl Category {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Category::All,
            Some(s) if s.eq_ignore_ascii_case("semua") || s.eq_ignore_ascii_case("all") => {
                Category::All
            }
            Some(s) => Category::Named(s.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Category::All => None,
            Category::Named(name) => Some(name),
        }
    }

    fn admits(&self, category: Option<&str>) -> bool {
        match self {
            Category::All => true,
            Category::Named(name) => category == Some(name.as_str()),
        }
    }
}

#[derive(Serialize)]
pub struct SectionView<'a, T: Section> {
    pub loaded: bool,
    pub category: Option<&'a str>,
    pub categories: Vec<&'a str>,
    pub items: Vec<&'a T>,
    pub selected: Option<&'a T>,
}

pub struct DisplaySection<T: Section> {
    items: Vec<T>,
    loaded: bool,
    selected_category: Category,
    selected_index: Option<usize>,
}

impl<T: Section> Default for DisplaySection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
            selected_category: Category::All,
            selected_index: None,
        }
    }
}

impl<T: Section> DisplaySection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            items,
            loaded: true,
            ..Self::default()
        }
    }

    pub async fn mount(store: &dyn ContentStore) -> Self {
        let mut section = Self::new();
        section.load(store).await;
        section
    }

    /// Fetches the table. Failures are logged and leave an empty section
    /// with `loaded == false`.
    pub async fn load(&mut self, store: &dyn ContentStore) {
        match Self::fetch(store).await {
            Ok(items) => {
                self.items = items;
                self.loaded = true;
            }
            Err(e) => {
                log::error!("Gagal memuat {}: {}", T::TABLE, e);
                self.items.clear();
                self.loaded = false;
            }
        }
        self.selected_index = None;
    }

    async fn fetch(store: &dyn ContentStore) -> Result<Vec<T>, StoreError> {
        let query = Query::all().order(T::order());
        let rows = store.select(T::TABLE, &query).await?;
        from_rows(rows)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn selected_category(&self) -> &Category {
        &self.selected_category
    }

    /// Changing the filter closes any open item, since indexes refer to the
    /// displayed list.
    pub fn select_category(&mut self, category: Category) {
        if self.selected_category != category {
            self.selected_category = category;
            self.selected_index = None;
        }
    }

    /// Items that pass the current filter, in loaded order.
    pub fn visible(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| self.selected_category.admits(item.category()))
            .collect()
    }

    /// Distinct categories in first-seen order, blanks skipped.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for category in self.items.iter().filter_map(|i| i.category()) {
            if !category.is_empty() && !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    pub fn open(&mut self, index: usize) {
        self.selected_index = Some(index);
    }

    pub fn close(&mut self) {
        self.selected_index = None;
    }

    /// The open item, resolved against the displayed list. An index past
    /// the end means nothing is open.
    pub fn selected(&self) -> Option<&T> {
        let index = self.selected_index?;
        self.visible().get(index).copied()
    }

    pub fn view(&self) -> SectionView<'_, T> {
        SectionView {
            loaded: self.loaded,
            category: self.selected_category.as_str(),
            categories: self.categories(),
            items: self.visible(),
            selected: self.selected(),
        }
    }
}
