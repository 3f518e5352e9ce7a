use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use super::{ChildFields, PartyFields, StorageError, Store};

struct DemoChild {
    name: &'static str,
    age: i32,
    wishes: &'static [&'static str],
}

struct DemoParty {
    name: &'static str,
    date: (i32, u32, u32, u32),
    location: &'static str,
    description: &'static str,
    children: &'static [DemoChild],
}

const DEMO: &[DemoParty] = &[
    DemoParty {
        name: "Winter Wonderland Party",
        date: (2024, 12, 20, 10),
        location: "Community Center, Johannesburg",
        description: "A magical Christmas party for children from local shelters",
        children: &[
            DemoChild {
                name: "Thabo",
                age: 8,
                wishes: &["A new bicycle", "Coloring books"],
            },
            DemoChild {
                name: "Lerato",
                age: 6,
                wishes: &["Dolls and accessories", "Warm winter coat"],
            },
        ],
    },
    DemoParty {
        name: "Santa's Workshop Celebration",
        date: (2024, 12, 22, 14),
        location: "Town Hall, Cape Town",
        description: "Join us for crafts, games, and holiday cheer",
        children: &[DemoChild {
            name: "Sipho",
            age: 10,
            wishes: &["Soccer ball", "Puzzle games"],
        }],
    },
];

fn demo_date((y, m, d, h): (i32, u32, u32, u32)) -> Result<NaiveDateTime, StorageError> {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|day| day.and_hms_opt(h, 0, 0))
        .ok_or_else(|| StorageError::InvalidInput(format!("bad demo date {y}-{m}-{d}")))
}

impl Store {
    /// Inserts the sample parties, children and wishlists, but only into a
    /// database without parties. Returns whether anything was inserted.
    pub async fn seed_demo(&self) -> Result<bool, StorageError> {
        if self.row_counts().await?.parties > 0 {
            info!("seed: parties already present, skipping demo data");
            return Ok(false);
        }
        for p in DEMO {
            let party = self
                .create_party(PartyFields {
                    name: p.name.to_string(),
                    date: demo_date(p.date)?,
                    location: p.location.to_string(),
                    description: p.description.to_string(),
                })
                .await?;
            for c in p.children {
                self.create_child(
                    ChildFields {
                        name: c.name.to_string(),
                        age: c.age,
                        party_id: party.id,
                        pledged: false,
                    },
                    c.wishes.iter().map(|w| w.to_string()).collect(),
                )
                .await?;
            }
            info!(party_id = party.id, name = p.name, "seed: demo party created");
        }
        Ok(true)
    }
}
