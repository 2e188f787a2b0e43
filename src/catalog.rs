//! The static healthcare-IT category catalog.
//!
//! Each category maps a display name to an ordered list of search terms
//! that are OR-joined into a news-API query expression. The catalog is
//! compiled in, immutable, and shared by every request; multi-word terms
//! are pre-quoted for the API's exact-phrase syntax.

/// A predefined grouping of related search terms.
#[derive(Debug)]
pub struct Category {
    pub name: &'static str,
    pub query_terms: &'static [&'static str],
}

/// All categories offered by the dashboard, in display order.
pub const CATEGORIES: &[Category] = &[
    Category {
        name: "Regulatory & Compliance",
        query_terms: &[
            "ONC",
            "\"Health IT\"",
            "HealthIT.gov",
            "USCDI",
            "\"FHIR compliance\"",
            "\"HHS regulations\"",
            "CMS",
            "\"EHR certification\"",
            "\"healthcare compliance\"",
            "\"EHR regulations\"",
        ],
    },
    Category {
        name: "FHIR & Interoperability",
        query_terms: &[
            "FHIR",
            "\"HL7 FHIR\"",
            "\"FHIR R5\"",
            "\"SMART on FHIR\"",
            "\"healthcare interoperability\"",
            "\"health data exchange\"",
            "\"EHR interoperability\"",
        ],
    },
    Category {
        name: "Government Policies",
        query_terms: &[
            "\"healthcare Executive Order\"",
            "\"healthcare Federal Register\"",
            "\"healthcare policy\"",
            "\"White House healthcare\"",
            "\"HHS policy\"",
            "\"healthcare regulation\"",
        ],
    },
    Category {
        name: "AI in Healthcare",
        query_terms: &[
            "\"AI healthcare\"",
            "\"machine learning healthcare\"",
            "\"OpenAI healthcare\"",
            "\"LLM healthcare\"",
            "\"predictive analytics EHR\"",
            "\"AI medical\"",
            "\"healthcare automation\"",
        ],
    },
    Category {
        name: "Market Trends",
        query_terms: &[
            "\"Epic EHR\"",
            "\"Cerner EHR\"",
            "\"Athenahealth EHR\"",
            "\"Meditech EHR\"",
            "\"EHR vendor\"",
            "\"health tech startup\"",
            "\"healthcare investment\"",
            "\"healthcare M&A\"",
        ],
    },
];

/// Look up a category by its exact display name.
pub fn find(name: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.name == name)
}

/// All category display names, in display order.
pub fn names() -> Vec<&'static str> {
    CATEGORIES.iter().map(|c| c.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_five_categories() {
        assert_eq!(CATEGORIES.len(), 5);
    }

    #[test]
    fn test_find_known_category() {
        let category = find("FHIR & Interoperability").unwrap();
        assert!(category.query_terms.contains(&"FHIR"));
    }

    #[test]
    fn test_find_unknown_category() {
        assert!(find("Sports").is_none());
        // Lookup is case-sensitive: the dashboard sends exact names.
        assert!(find("market trends").is_none());
    }

    #[test]
    fn test_every_category_has_terms() {
        for category in CATEGORIES {
            assert!(
                !category.query_terms.is_empty(),
                "category {} has no terms",
                category.name
            );
        }
    }

    #[test]
    fn test_names_in_display_order() {
        let names = names();
        assert_eq!(names.first(), Some(&"Regulatory & Compliance"));
        assert_eq!(names.last(), Some(&"Market Trends"));
    }
}
