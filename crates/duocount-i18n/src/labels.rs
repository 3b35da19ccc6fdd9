#![forbid(unsafe_code)]

//! The display strings the application renders, and their built-in table.

use crate::language::Language;

/// Resolved display strings for one language.
///
/// Built once per fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelBundle {
    title: String,
    increment: String,
    decrease: String,
    change_language: String,
}

impl LabelBundle {
    pub fn new(
        title: impl Into<String>,
        increment: impl Into<String>,
        decrease: impl Into<String>,
        change_language: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            increment: increment.into(),
            decrease: decrease.into(),
            change_language: change_language.into(),
        }
    }

    /// The built-in bundle for `language`.
    pub fn builtin(language: Language) -> Self {
        let (title, increment, decrease, change_language) = builtin_row(language);
        Self::new(title, increment, decrease, change_language)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn increment(&self) -> &str {
        &self.increment
    }

    pub fn decrease(&self) -> &str {
        &self.decrease
    }

    pub fn change_language(&self) -> &str {
        &self.change_language
    }
}

const fn builtin_row(language: Language) -> (&'static str, &'static str, &'static str, &'static str) {
    match language {
        Language::English => ("Tests example", "Increment", "Decrease", "Change Language"),
        Language::Portuguese => ("Exemplo de tests", "Somar", "Diminuir", "Trocar lingua"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_bundle() {
        let en = LabelBundle::builtin(Language::English);
        assert_eq!(en.title(), "Tests example");
        assert_eq!(en.increment(), "Increment");
        assert_eq!(en.decrease(), "Decrease");
        assert_eq!(en.change_language(), "Change Language");
    }

    #[test]
    fn portuguese_bundle() {
        let pt = LabelBundle::builtin(Language::Portuguese);
        assert_eq!(pt.title(), "Exemplo de tests");
        assert_eq!(pt.increment(), "Somar");
        assert_eq!(pt.decrease(), "Diminuir");
        assert_eq!(pt.change_language(), "Trocar lingua");
    }

    #[test]
    fn languages_have_distinct_bundles() {
        assert_ne!(
            LabelBundle::builtin(Language::English),
            LabelBundle::builtin(Language::Portuguese)
        );
    }
}
