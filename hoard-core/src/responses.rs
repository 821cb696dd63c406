//! Shapes of the server's answers to list and item mutations.
//!
//! The server has already merged everything by the time these arrive, the
//! client only needs to tell the shapes apart and apply them.

use serde::Deserialize;

use crate::{List, ListItem};

/// The answer to creating a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawCreatedList")]
pub enum CreatedList {
    /// The game already had an aggregate list
    Single(List),
    /// This was the game's first list, so the server created the aggregate list too
    WithAggregate { aggregate: List, list: List },
}

impl CreatedList {
    /// The list the user asked for
    pub fn list(&self) -> &List {
        match self {
            Self::Single(list) => list,
            Self::WithAggregate { list, .. } => list,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCreatedList {
    Pair(Vec<List>),
    Single(List),
}

impl TryFrom<RawCreatedList> for CreatedList {
    type Error = String;

    fn try_from(raw: RawCreatedList) -> Result<Self, Self::Error> {
        match raw {
            RawCreatedList::Single(list) => Ok(Self::Single(list)),
            RawCreatedList::Pair(lists) => {
                let [first, second]: [List; 2] = lists
                    .try_into()
                    .map_err(|l: Vec<List>| format!("expected 2 lists, got {}", l.len()))?;

                // Aggregate comes first, but trust the flag over the position
                let (aggregate, list) = if second.aggregate && !first.aggregate {
                    (second, first)
                } else {
                    (first, second)
                };

                Ok(Self::WithAggregate { aggregate, list })
            }
        }
    }
}

/// The answer to creating or updating an item: `[aggregate_item, regular_item]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "(ListItem, ListItem)")]
pub struct ItemPair {
    pub aggregate: ListItem,
    pub regular: ListItem,
}

impl From<(ListItem, ListItem)> for ItemPair {
    fn from((aggregate, regular): (ListItem, ListItem)) -> Self {
        Self { aggregate, regular }
    }
}

/// The answer to destroying a list.
#[derive(Debug, Clone, PartialEq)]
pub enum DestroyedList {
    /// 204: that was the last regular list, the aggregate list is gone as well
    Emptied,
    /// 200: the aggregate list survived, with quantities adjusted
    Adjusted(List),
}

/// The answer to destroying an item.
#[derive(Debug, Clone, PartialEq)]
pub enum DestroyedItem {
    /// 204: the aggregate item had the same quantity and is gone too
    Removed,
    /// 200: the aggregate item with its quantity reduced and notes trimmed
    Adjusted(ListItem),
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn list_json(id: u32, aggregate: bool) -> serde_json::Value {
        json!({
            "id": id,
            "game_id": 3,
            "title": format!("List {}", id),
            "aggregate": aggregate,
            "list_items": []
        })
    }

    #[test]
    fn test_created_list_single() {
        let created: CreatedList = serde_json::from_value(list_json(8, false)).unwrap();

        assert!(matches!(created, CreatedList::Single(ref l) if l.id == 8));
        assert_eq!(created.list().id, 8);
    }

    #[test]
    fn test_created_list_with_aggregate() {
        let created: CreatedList =
            serde_json::from_value(json!([list_json(1, true), list_json(2, false)])).unwrap();

        match created {
            CreatedList::WithAggregate { aggregate, list } => {
                assert_eq!(aggregate.id, 1);
                assert_eq!(list.id, 2);
            }
            other => panic!("Expected a pair, got {:?}", other),
        }
    }

    #[test]
    fn test_created_list_pair_out_of_order() {
        let created: CreatedList =
            serde_json::from_value(json!([list_json(2, false), list_json(1, true)])).unwrap();

        match created {
            CreatedList::WithAggregate { aggregate, list } => {
                assert!(aggregate.aggregate);
                assert_eq!(list.id, 2);
            }
            other => panic!("Expected a pair, got {:?}", other),
        }
    }

    #[test]
    fn test_created_list_rejects_other_lengths() {
        let result: Result<CreatedList, _> = serde_json::from_value(json!([list_json(1, true)]));
        assert!(result.is_err());
    }

    #[test]
    fn test_item_pair_from_array() {
        let pair: ItemPair = serde_json::from_value(json!([
            {
                "id": 856,
                "list_id": 1,
                "description": "Dwarven metal ingots",
                "quantity": 10,
                "notes": "To make bolts with"
            },
            {
                "id": 855,
                "list_id": 7,
                "description": "Dwarven metal ingots",
                "quantity": 10,
                "notes": "To make bolts with"
            }
        ]))
        .unwrap();

        assert_eq!(pair.aggregate.id, 856);
        assert_eq!(pair.regular.list_id, 7);
    }
}
