use std::fmt;

/// Standard trending categories with their README row labels, in row order.
const STANDARD: &[(&str, &str)] = &[
    ("book", "books"),
    ("movie", "movies"),
    ("tv", "tv"),
    ("music", "music"),
    ("game", "games"),
    ("podcast", "podcasts"),
    ("collection", "collections"),
];

/// One trending type, e.g. `book`. Used verbatim in request paths and file names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Category(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid category {0:?}: expected lowercase letters, digits, '_' or '-'")]
pub struct InvalidCategory(pub String);

impl Category {
    pub fn parse(input: &str) -> Result<Self, InvalidCategory> {
        let id = input.trim();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
        if valid {
            Ok(Self(id.to_string()))
        } else {
            Err(InvalidCategory(input.to_string()))
        }
    }

    /// The seven standard categories in their fixed order.
    pub fn standard() -> Vec<Category> {
        STANDARD
            .iter()
            .map(|(id, _)| Category((*id).to_string()))
            .collect()
    }

    /// Parse a comma-separated list, skipping empty items.
    pub fn parse_list(csv: &str) -> Result<Vec<Category>, InvalidCategory> {
        csv.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Category::parse)
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered `(category, label)` rows used when rendering README tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    rows: Vec<(Category, String)>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl CategoryTable {
    pub fn standard() -> Self {
        Self {
            rows: STANDARD
                .iter()
                .map(|(id, label)| (Category((*id).to_string()), (*label).to_string()))
                .collect(),
        }
    }

    /// Standard rows followed by any configured category the standard table
    /// lacks, labelled with its own identifier.
    pub fn for_categories(configured: &[Category]) -> Self {
        let mut table = Self::standard();
        for category in configured {
            if table.label(category).is_none() {
                table
                    .rows
                    .push((category.clone(), category.as_str().to_string()));
            }
        }
        table
    }

    pub fn label(&self, category: &Category) -> Option<&str> {
        self.rows
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, label)| label.as_str())
    }

    pub fn rows(&self) -> impl Iterator<Item = (&Category, &str)> {
        self.rows.iter().map(|(c, label)| (c, label.as_str()))
    }
}
