use serde_json::from_str;

use crate::v0::{Event, EventRequest, Major};
use crate::ReferenceDb;

#[derive(Debug, Deserialize)]
#[serde(tag = "_object_type")]
enum LoadedFixture {
    Event(Event),
    EventRequest(EventRequest),
    Major(Major),
    ClubMajor { club_id: String, major_id: String },
    Votes { request_id: String, count: usize },
}

pub async fn load_fixture(db: &ReferenceDb, input: &str) {
    // Deserialise the fixtures
    let items: Vec<LoadedFixture> = from_str(input).expect("Failed to deserialise fixture");

    // Load all of the items within
    for item in items {
        match item {
            LoadedFixture::Event(event) => db.seed_events([event]).await,
            LoadedFixture::EventRequest(request) => db.seed_event_requests([request]).await,
            LoadedFixture::Major(major) => db.seed_majors([major]).await,
            LoadedFixture::ClubMajor { club_id, major_id } => {
                db.seed_club_majors(&club_id, [major_id]).await
            }
            LoadedFixture::Votes { request_id, count } => db.seed_votes(&request_id, count).await,
        }
    }
}

#[macro_export]
macro_rules! fixture {
    ( $database:expr, $name:expr ) => {
        $crate::util::test_fixtures::load_fixture(
            $database
                .as_reference()
                .expect("fixtures are only loaded into the reference database"),
            include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/", $name, ".json")),
        )
        .await
    };
}
