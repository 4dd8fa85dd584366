use crate::error::Result;
use crate::model::{EntityDescriptor, FieldDef, FieldType, Primitive, SchemaRegistry};

pub const TITLE: &str = "Title";
pub const NAME: &str = "Name";
pub const RATING: &str = "Rating";
pub const CERTIFICATE: &str = "Certificate";
pub const LANGUAGE: &str = "Language";
pub const COUNTRY: &str = "Country";
pub const CRITIC_REVIEW: &str = "CriticReview";
pub const CREDIT: &str = "Credit";
pub const POSTER: &str = "Poster";
pub const AVATAR: &str = "Avatar";

fn string(name: &str) -> FieldDef {
    FieldDef::new(name, FieldType::Scalar(Primitive::String))
}

fn integer(name: &str) -> FieldDef {
    FieldDef::new(name, FieldType::Scalar(Primitive::Integer))
}

fn float(name: &str) -> FieldDef {
    FieldDef::new(name, FieldType::Scalar(Primitive::Float))
}

fn boolean(name: &str) -> FieldDef {
    FieldDef::new(name, FieldType::Scalar(Primitive::Boolean))
}

fn entity(name: &str, kind: &str) -> FieldDef {
    FieldDef::new(name, FieldType::entity(kind))
}

fn strings(name: &str) -> FieldDef {
    FieldDef::new(name, FieldType::list_of(Primitive::String))
}

fn entities(name: &str, kind: &str) -> FieldDef {
    FieldDef::new(name, FieldType::list_of_entity(kind))
}

/// Build the registry of every entity kind the IMDb API exposes.
///
/// `Title.credits` and `Name.known_for` stay out of the main attributes:
/// Title -> Credit -> Name -> Title would otherwise expand forever when a
/// default selection is synthesized.
pub fn build_registry() -> Result<SchemaRegistry> {
    SchemaRegistry::builder()
        .declare(EntityDescriptor::new(
            TITLE,
            vec![
                string("id").required().main(),
                string("type").main(),
                boolean("is_adult"),
                string("primary_title").main(),
                string("original_title").main(),
                integer("start_year").main(),
                integer("end_year"),
                integer("runtime_minutes").main(),
                string("plot"),
                entity("rating", RATING),
                entities("certificates", CERTIFICATE).main(),
                entity("critic_review", CRITIC_REVIEW).main(),
                strings("genres").main(),
                entities("spoken_languages", LANGUAGE).main(),
                entities("origin_countries", COUNTRY).main(),
                entities("posters", POSTER).main(),
                entities("credits", CREDIT),
            ],
        ))
        .declare(EntityDescriptor::new(
            NAME,
            vec![
                string("id").required().main(),
                string("display_name").main(),
                strings("alternate_names").main(),
                integer("birth_year").main(),
                string("birth_location").main(),
                integer("death_year").main(),
                string("death_location").main(),
                string("dead_reason").main(),
                entities("avatars", AVATAR).main(),
                // Slow to resolve and loops back through Title
                entities("known_for", TITLE),
            ],
        ))
        .declare(EntityDescriptor::new(
            RATING,
            vec![float("aggregate_rating").main(), integer("votes_count").main()],
        ))
        .declare(EntityDescriptor::new(
            CERTIFICATE,
            vec![entity("country", COUNTRY).main(), string("rating").main()],
        ))
        .declare(EntityDescriptor::new(
            LANGUAGE,
            vec![string("code").main(), string("name").main()],
        ))
        .declare(EntityDescriptor::new(
            COUNTRY,
            vec![string("code").main(), string("name").main()],
        ))
        .declare(EntityDescriptor::new(
            CRITIC_REVIEW,
            vec![integer("score").main(), integer("review_count").main()],
        ))
        .declare(EntityDescriptor::new(
            CREDIT,
            vec![
                entity("name", NAME).main(),
                string("category").main(),
                strings("characters").main(),
                integer("episodes_count").main(),
            ],
        ))
        .declare(EntityDescriptor::new(
            POSTER,
            vec![
                string("url").main(),
                integer("width").main(),
                integer("height").main(),
                string("language_code").main(),
            ],
        ))
        .declare(EntityDescriptor::new(
            AVATAR,
            vec![
                string("url").main(),
                integer("width").main(),
                integer("height").main(),
            ],
        ))
        .build()
}
