/// A selectable class and where its grades are published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    pub label: String,
    /// Empty when the class has not been configured yet.
    pub locator: String,
    /// Value of the `TURMA` column when the sheet is shared between classes.
    pub filter_key: Option<String>,
}

impl ClassEntry {
    pub fn is_available(&self) -> bool {
        !self.locator.trim().is_empty()
    }
}

/// `(label, environment variable, class filter)` for every known class.
const CLASSES: &[(&str, &str, Option<&str>)] = &[
    ("2º Período C - POO", "URL_2P_C_POO", None),
    ("4º Período A - ML", "URL_4P_GERAL_ML", Some("4P_A")),
    ("4º Período B - ML", "URL_4P_GERAL_ML", Some("4P_B")),
    ("4º Período C - ML", "URL_4P_GERAL_ML", Some("4P_C")),
];

/// Immutable label → [`ClassEntry`] table, built once at start-up.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<ClassEntry>,
}

impl Registry {
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the registry, resolving each class's locator through `lookup`.
    /// A variable that is not set leaves the locator empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let entries = CLASSES
            .iter()
            .map(|&(label, var, filter)| {
                let locator = lookup(var).unwrap_or_default().trim().to_string();
                if locator.is_empty() {
                    log::warn!("{var} is not set; '{label}' will be unavailable");
                }
                ClassEntry {
                    label: label.to_string(),
                    locator,
                    filter_key: filter.map(str::to_string),
                }
            })
            .collect();
        Registry { entries }
    }

    pub fn resolve(&self, label: &str) -> Option<&ClassEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    /// Labels in selector order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }
}
