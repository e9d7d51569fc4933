//! The fixed set of monitored locations and the keys used to fetch them.

use crate::config::error::ConfigError;
use std::collections::HashSet;

/// Regional centres of Ukraine, keyed by the English name OpenWeatherMap resolves.
const UKRAINE: [(&str, &str); 25] = [
    ("Київ", "Kiev"),
    ("Харків", "Kharkiv"),
    ("Львів", "Lviv"),
    ("Одеса", "Odesa"),
    ("Дніпро", "Dnipro"),
    ("Полтава", "Poltava"),
    ("Запоріжжя", "Zaporizhzhia"),
    ("Івано-Франківськ", "Ivano-Frankivsk"),
    ("Тернопіль", "Ternopil"),
    ("Вінниця", "Vinnytsia"),
    ("Рівне", "Rivne"),
    ("Хмельницький", "Khmelnytskyi"),
    ("Луцьк", "Lutsk"),
    ("Житомир", "Zhytomyr"),
    ("Черкаси", "Cherkasy"),
    ("Кропивницький", "Kropyvnytskyi"),
    ("Чернівці", "Chernivtsi"),
    ("Чернігів", "Chernihiv"),
    ("Миколаїв", "Mykolaiv"),
    ("Ужгород", "Uzhhorod"),
    ("Суми", "Sumy"),
    ("Херсон", "Kherson"),
    ("Донецьк", "Donetsk"),
    ("Луганськ", "Luhansk"),
    ("Сімферополь", "Simferopol"),
];

/// One monitored location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Name shown on the chart and stored in the snapshot.
    pub name: String,
    /// Identifier handed to the temperature source.
    pub fetch_key: String,
}

/// Immutable, ordered mapping from display name to fetch key.
///
/// Iteration order is the order entries were given in, and it is the order of
/// every [`ReadingStore`](crate::ReadingStore) built from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationCatalog {
    locations: Vec<Location>,
}

impl LocationCatalog {
    /// Builds a catalog from `(display name, fetch key)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCatalog`] for an empty input and
    /// [`ConfigError::DuplicateLocation`] if a display name repeats.
    ///
    /// # Examples
    ///
    /// ```
    /// use citytemp::LocationCatalog;
    ///
    /// let catalog = LocationCatalog::new([("Kyiv", "Kiev"), ("Lviv", "Lviv")]).unwrap();
    /// assert_eq!(catalog.fetch_key("Kyiv"), Some("Kiev"));
    /// assert!(LocationCatalog::new([("Kyiv", "Kiev"), ("Kyiv", "Kyiv")]).is_err());
    /// ```
    pub fn new<I, N, K>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (N, K)>,
        N: Into<String>,
        K: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut locations = Vec::new();
        for (name, fetch_key) in entries {
            let name = name.into();
            if !seen.insert(name.clone()) {
                return Err(ConfigError::DuplicateLocation(name));
            }
            locations.push(Location {
                name,
                fetch_key: fetch_key.into(),
            });
        }
        if locations.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        Ok(Self { locations })
    }

    /// The 25-city catalog of the reference deployment.
    pub fn ukraine() -> Self {
        Self {
            locations: UKRAINE
                .iter()
                .map(|(name, fetch_key)| Location {
                    name: name.to_string(),
                    fetch_key: fetch_key.to_string(),
                })
                .collect(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.locations.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().map(|l| l.name.as_str())
    }

    pub fn fetch_key(&self, name: &str) -> Option<&str> {
        self.locations
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.fetch_key.as_str())
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl<'a> IntoIterator for &'a LocationCatalog {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ukraine_catalog_has_unique_names() {
        let catalog = LocationCatalog::ukraine();
        assert_eq!(catalog.len(), 25);

        let unique: HashSet<&str> = catalog.names().collect();
        assert_eq!(unique.len(), catalog.len());
        assert_eq!(catalog.fetch_key("Київ"), Some("Kiev"));
        assert_eq!(catalog.names().last(), Some("Сімферополь"));
    }

    #[test]
    fn test_new_preserves_order() {
        let catalog =
            LocationCatalog::new([("Odesa", "Odesa"), ("Kyiv", "Kiev"), ("Lviv", "Lviv")])
                .unwrap();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, ["Odesa", "Kyiv", "Lviv"]);
    }

    #[test]
    fn test_new_rejects_duplicates_and_empty() {
        let duplicate = LocationCatalog::new([("Sumy", "Sumy"), ("Sumy", "Sumy")]);
        assert!(matches!(duplicate, Err(ConfigError::DuplicateLocation(name)) if name == "Sumy"));

        let empty = LocationCatalog::new(Vec::<(String, String)>::new());
        assert!(matches!(empty, Err(ConfigError::EmptyCatalog)));
    }
}
