use itertools::Itertools;

use crate::error::Result;
use crate::model::{CanonicalId, EntityDescriptor, IdKind, SchemaRegistry};

/// Builds GraphQL field selections from entity descriptors.
///
/// The root descriptor selects every field; each nested descriptor only
/// selects its main attributes. There is no visited-set: a schema whose
/// main attributes loop back on themselves recurses without bound;
/// `SchemaBuilder::build` rejects such schemas in debug builds.
pub struct QueryBuilder<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Space-separated field selection for `descriptor`
    pub fn selection(&self, descriptor: &EntityDescriptor, include_all: bool) -> Result<String> {
        let mut fragments = Vec::with_capacity(descriptor.fields.len());
        for field in &descriptor.fields {
            if !(include_all || field.main_attribute) {
                continue;
            }
            match field.field_type.referenced_kind() {
                Some(kind) => {
                    let nested = self.registry.descriptor(kind)?;
                    fragments.push(format!(
                        "{} {{ {} }}",
                        field.name,
                        self.selection(nested, false)?
                    ));
                }
                None => fragments.push(field.name.clone()),
            }
        }
        Ok(fragments.into_iter().join(" "))
    }

    /// Full query document fetching one root entity by canonical id
    pub fn root_query(&self, kind: IdKind, id: &CanonicalId) -> Result<String> {
        let descriptor = self.registry.descriptor(kind.descriptor_name())?;
        let attributes = self.selection(descriptor, true)?;
        Ok(format!(
            "query {} {{ {}(id: \"{}\") {{ {} }} }}",
            operation_name(kind),
            root_field(kind),
            id,
            attributes
        ))
    }
}

/// Top-level GraphQL field a kind is fetched through
pub fn root_field(kind: IdKind) -> &'static str {
    match kind {
        IdKind::Title => "title",
        IdKind::Name => "name",
    }
}

fn operation_name(kind: IdKind) -> &'static str {
    match kind {
        IdKind::Title => "titleById",
        IdKind::Name => "personById",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{build_registry, catalog, normalize};

    const TITLE_QUERY: &str = concat!(
        r#"query titleById { title(id: "tt0477051") { "#,
        "id type is_adult primary_title original_title start_year end_year runtime_minutes plot ",
        "rating { aggregate_rating votes_count } ",
        "certificates { country { code name } rating } ",
        "critic_review { score review_count } genres ",
        "spoken_languages { code name } origin_countries { code name } ",
        "posters { url width height language_code } ",
        "credits { name { id display_name alternate_names birth_year birth_location ",
        "death_year death_location dead_reason avatars { url width height } } ",
        "category characters episodes_count } } }"
    );

    const PERSON_QUERY: &str = concat!(
        r#"query personById { name(id: "nm0000115") { "#,
        "id display_name alternate_names birth_year birth_location death_year ",
        "death_location dead_reason avatars { url width height } ",
        "known_for { id type primary_title original_title start_year runtime_minutes ",
        "certificates { country { code name } rating } critic_review { score review_count } ",
        "genres spoken_languages { code name } origin_countries { code name } ",
        "posters { url width height language_code } } } }"
    );

    #[test]
    fn test_title_root_query() {
        let registry = build_registry().unwrap();
        let builder = QueryBuilder::new(&registry);
        let id = normalize("tt0477051", IdKind::Title).unwrap();
        assert_eq!(builder.root_query(IdKind::Title, &id).unwrap(), TITLE_QUERY);
    }

    #[test]
    fn test_person_root_query() {
        let registry = build_registry().unwrap();
        let builder = QueryBuilder::new(&registry);
        let id = normalize(115, IdKind::Name).unwrap();
        assert_eq!(builder.root_query(IdKind::Name, &id).unwrap(), PERSON_QUERY);
    }

    #[test]
    fn test_nested_contributor_stops_at_main_attributes() {
        let registry = build_registry().unwrap();
        let builder = QueryBuilder::new(&registry);
        let title = registry.descriptor(catalog::TITLE).unwrap();
        let query = builder.selection(title, true).unwrap();

        assert!(query.contains("credits { name { id display_name"));
        assert!(!query.contains("known_for"));
    }

    #[test]
    fn test_default_selection_filters_non_main() {
        let registry = build_registry().unwrap();
        let builder = QueryBuilder::new(&registry);
        let title = registry.descriptor(catalog::TITLE).unwrap();
        let query = builder.selection(title, false).unwrap();

        for excluded in ["is_adult", "end_year", "plot", "rating {", "credits"] {
            assert!(!query.contains(excluded), "default selection has {}", excluded);
        }
        assert!(query.starts_with("id type primary_title"));
    }

    #[test]
    fn test_every_kind_synthesizes() {
        let registry = build_registry().unwrap();
        let builder = QueryBuilder::new(&registry);
        for kind in registry.kinds() {
            let descriptor = registry.descriptor(kind).unwrap();
            let all = builder.selection(descriptor, true).unwrap();
            let main = builder.selection(descriptor, false).unwrap();
            assert!(!all.is_empty());
            assert!(all.len() >= main.len());
            assert_eq!(all.matches('{').count(), all.matches('}').count());
        }
    }
}
