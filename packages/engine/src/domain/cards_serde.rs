//! Serialization and deserialization for card types
//!
//! Wire shapes:
//! - Suit: lowercase name (`"hearts"`), any case accepted on input.
//! - Rank: symbol (`"A"`, `"7"`); bare integers are accepted for numeric ranks.
//! - Card: `{ "suit", "rank", "pointValue", "id" }`, or a token string
//!   (`"AH"`, `"hearts-A"`). `pointValue` and `id` are derived, never trusted.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use super::cards_types::{Card, Rank, Suit};

// Suit serde
impl Serialize for Suit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Suit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Suit>()
            .map_err(|_| de::Error::custom(format!("Invalid suit: {s}")))
    }
}

// Rank serde
impl Serialize for Rank {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.symbol())
    }
}

struct RankVisitor;

impl Visitor<'_> for RankVisitor {
    type Value = Rank;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a rank symbol (A, K, Q, J, 7, 6, 5, 4, 3)")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Rank, E> {
        v.parse::<Rank>()
            .map_err(|_| E::custom(format!("Invalid rank: {v}")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Rank, E> {
        self.visit_str(&v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Rank, E> {
        self.visit_str(&v.to_string())
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RankVisitor)
    }
}

// Card serde
impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut st = serializer.serialize_struct("Card", 4)?;
        st.serialize_field("suit", &self.suit)?;
        st.serialize_field("rank", &self.rank)?;
        st.serialize_field("pointValue", &self.point_value())?;
        st.serialize_field("id", &self.id())?;
        st.end()
    }
}

struct CardVisitor;

impl<'de> Visitor<'de> for CardVisitor {
    type Value = Card;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a card object or card token")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Card, E> {
        v.parse::<Card>().map_err(E::custom)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Card, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut suit: Option<Suit> = None;
        let mut rank: Option<Rank> = None;
        let mut point_value: Option<serde_json::Value> = None;
        let mut id: Option<serde_json::Value> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "suit" => suit = Some(map.next_value()?),
                "rank" => rank = Some(map.next_value()?),
                "pointValue" => point_value = Some(map.next_value()?),
                "id" => id = Some(map.next_value()?),
                _ => {
                    map.next_value::<de::IgnoredAny>()?;
                }
            }
        }

        let suit = suit.ok_or_else(|| de::Error::missing_field("suit"))?;
        let rank = rank.ok_or_else(|| de::Error::missing_field("rank"))?;
        let card = Card { suit, rank };

        if let Some(pv) = point_value {
            if pv.as_u64() != Some(u64::from(card.point_value())) {
                warn!(card = %card.id(), supplied = %pv, "pointValue mismatch, using rank table");
            }
        }
        if let Some(id) = id {
            if id.as_str() != Some(card.id().as_str()) {
                warn!(card = %card.id(), supplied = %id, "card id mismatch, using derived id");
            }
        }
        Ok(card)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(CardVisitor)
    }
}
