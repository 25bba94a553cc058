//! Shared constructors for in-crate tests.

use serde_json::Map;
use twinmap_core::{Relation, RelationId, RelationKind, Thing, ThingId, ThingKind};

pub(crate) fn thing(id: &str, name: &str, kind: ThingKind) -> Thing {
    Thing {
        id: ThingId(id.to_string()),
        name: name.to_string(),
        kind,
        description: String::new(),
        attributes: Map::new(),
        features: Map::new(),
        created_at: None,
        updated_at: None,
    }
}

pub(crate) fn relation(id: &str, source: &str, target: &str, kind: RelationKind) -> Relation {
    Relation {
        id: RelationId(id.to_string()),
        source: ThingId(source.to_string()),
        target: ThingId(target.to_string()),
        kind,
        name: id.to_string(),
        description: String::new(),
        properties: Map::new(),
        created_at: None,
        updated_at: None,
    }
}
