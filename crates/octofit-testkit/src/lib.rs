// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use octofit_app::ResourceKind;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::thread::{self, JoinHandle};
use std::time::Duration as StdDuration;
use time::{Date, Duration};
use tiny_http::{Header, Response, Server};

pub const DEMO_SEED: u64 = 8000;
const DEMO_ACTIVITY_COUNT: usize = 12;
const REFERENCE_DATE: Date = time::macros::date!(2026 - 01 - 01);
const REQUEST_WAIT: StdDuration = StdDuration::from_secs(5);

const TEAMS: [(&str, &str); 2] = [
    ("Marvel", "Earth's mightiest training squad"),
    ("DC", "Justice League conditioning crew"),
];

// (name, email, team index)
const HEROES: [(&str, &str, usize); 8] = [
    ("Iron Man", "ironman@marvel.com", 0),
    ("Captain America", "cap@marvel.com", 0),
    ("Black Widow", "widow@marvel.com", 0),
    ("Thor", "thor@marvel.com", 0),
    ("Batman", "batman@dc.com", 1),
    ("Superman", "superman@dc.com", 1),
    ("Wonder Woman", "diana@dc.com", 1),
    ("Flash", "flash@dc.com", 1),
];

const ACTIVITY_TYPES: [&str; 8] = [
    "Running",
    "Cycling",
    "Swimming",
    "Walking",
    "Rowing",
    "Strength Training",
    "Yoga",
    "Hiking",
];

const WORKOUTS: [(&str, &str); 5] = [
    ("Hero HIIT", "High intensity workout for heroes"),
    ("Power Yoga", "Yoga for super strength"),
    ("Cape Mobility", "Shoulder and hip mobility flow"),
    ("Gotham Stairs", "Stair sprints for explosive legs"),
    ("Asgard Carry", "Loaded carries and grip endurance"),
];

const DIFFICULTIES: [&str; 3] = ["easy", "moderate", "hard"];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Collections shaped like the Django REST backend serves them.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoDataset {
    pub activities: Vec<Value>,
    pub leaderboard: Vec<Value>,
    pub teams: Vec<Value>,
    pub users: Vec<Value>,
    pub workouts: Vec<Value>,
}

impl DemoDataset {
    pub fn records(&self, kind: ResourceKind) -> &[Value] {
        match kind {
            ResourceKind::Activities => &self.activities,
            ResourceKind::Leaderboard => &self.leaderboard,
            ResourceKind::Teams => &self.teams,
            ResourceKind::Users => &self.users,
            ResourceKind::Workouts => &self.workouts,
        }
    }

    /// Activities and leaderboard come back paginated; the rest as bare arrays.
    pub fn body(&self, kind: ResourceKind) -> Value {
        let records = self.records(kind).to_vec();
        match kind {
            ResourceKind::Activities | ResourceKind::Leaderboard => json!({
                "count": records.len(),
                "next": null,
                "previous": null,
                "results": records,
            }),
            ResourceKind::Teams | ResourceKind::Users | ResourceKind::Workouts => {
                Value::Array(records)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FitnessFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl FitnessFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn dataset(&mut self, activity_count: usize) -> DemoDataset {
        let teams = TEAMS
            .iter()
            .enumerate()
            .map(|(index, (name, description))| {
                let members = HEROES
                    .iter()
                    .filter(|(_, _, team)| *team == index)
                    .map(|(hero, _, _)| *hero)
                    .collect::<Vec<_>>();
                json!({
                    "id": index + 1,
                    "name": name,
                    "description": description,
                    "members": members,
                })
            })
            .collect();

        let users = HEROES
            .iter()
            .enumerate()
            .map(|(index, (name, email, team))| {
                json!({
                    "id": index + 1,
                    "name": name,
                    "email": email,
                    "team": TEAMS[*team].0,
                })
            })
            .collect();

        let mut minutes_by_hero: BTreeMap<usize, i64> = BTreeMap::new();
        let activities = (0..activity_count)
            .map(|index| {
                let hero = self.int_n(HEROES.len());
                let duration = self.int_range(15, 90);
                let days_ago = self.int_range(0, 60);
                *minutes_by_hero.entry(hero).or_default() += duration;
                json!({
                    "id": index + 1,
                    "user": HEROES[hero].0,
                    "type": self.pick(&ACTIVITY_TYPES),
                    "duration": duration,
                    "date": (REFERENCE_DATE - Duration::days(days_ago)).to_string(),
                })
            })
            .collect();

        let workouts = WORKOUTS
            .iter()
            .enumerate()
            .map(|(index, (name, description))| {
                json!({
                    "id": index + 1,
                    "name": name,
                    "description": description,
                    "difficulty": self.pick(&DIFFICULTIES),
                    "duration": self.int_range(20, 60),
                })
            })
            .collect();

        let mut standings = minutes_by_hero.into_iter().collect::<Vec<_>>();
        standings.sort_by(|left, right| right.1.cmp(&left.1).then(left.0.cmp(&right.0)));
        let leaderboard = standings
            .into_iter()
            .enumerate()
            .map(|(rank, (hero, points))| {
                let (name, _, team) = HEROES[hero];
                json!({
                    "id": rank + 1,
                    "user": name,
                    "team": TEAMS[team].0,
                    "points": points,
                })
            })
            .collect();

        DemoDataset {
            activities,
            leaderboard,
            teams,
            users,
            workouts,
        }
    }

    fn pick(&mut self, values: &[&'static str]) -> &'static str {
        values[self.rng.int_n(values.len())]
    }

    fn int_range(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        low + self.rng.int_n((high - low + 1) as usize) as i64
    }
}

pub fn demo_dataset() -> DemoDataset {
    FitnessFaker::new(DEMO_SEED).dataset(DEMO_ACTIVITY_COUNT)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
}

impl MockResponse {
    pub fn json(value: &Value) -> Self {
        Self {
            status: 200,
            body: value.to_string(),
        }
    }

    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self::raw(status, r#"{"detail":"mock failure"}"#)
    }
}

/// One-shot HTTP server that answers requests in order with canned
/// responses and records the request paths it saw.
pub struct MockApi {
    base_url: String,
    handle: JoinHandle<Result<Vec<String>>>,
}

impl MockApi {
    pub fn serve(responses: Vec<MockResponse>) -> Result<Self> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let base_url = format!("http://{}/api", server.server_addr());

        let handle = thread::spawn(move || -> Result<Vec<String>> {
            let mut paths = Vec::with_capacity(responses.len());
            for response in responses {
                let Some(request) = server
                    .recv_timeout(REQUEST_WAIT)
                    .context("receive mock request")?
                else {
                    bail!("mock api timed out waiting for request {}", paths.len() + 1);
                };
                paths.push(request.url().to_owned());
                let content_type = Header::from_bytes("Content-Type", "application/json")
                    .map_err(|()| anyhow!("invalid content type header"))?;
                request
                    .respond(
                        Response::from_string(response.body)
                            .with_status_code(response.status)
                            .with_header(content_type),
                    )
                    .context("send mock response")?;
            }
            Ok(paths)
        });

        Ok(Self { base_url, handle })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Waits for every canned response to be served and returns the paths
    /// requested, in order.
    pub fn finish(self) -> Result<Vec<String>> {
        self.handle
            .join()
            .map_err(|_| anyhow!("mock api thread panicked"))?
    }
}

#[cfg(test)]
mod tests {
    use super::{DEMO_SEED, FitnessFaker, MockApi, MockResponse, demo_dataset};
    use anyhow::Result;
    use octofit_app::ResourceKind;
    use serde_json::json;
    use std::collections::BTreeSet;
    use std::io::{Read, Write};
    use std::net::TcpStream;

    #[test]
    fn same_seed_produces_same_dataset() {
        let first = FitnessFaker::new(42).dataset(10);
        let second = FitnessFaker::new(42).dataset(10);
        assert_eq!(first, second);
    }

    #[test]
    fn zero_seed_is_normalized() {
        assert_eq!(FitnessFaker::new(0).seed(), 1);
        assert_eq!(FitnessFaker::new(DEMO_SEED).seed(), DEMO_SEED);
    }

    #[test]
    fn dataset_ids_are_unique_per_collection() {
        let dataset = demo_dataset();
        for kind in ResourceKind::ALL {
            let ids = dataset
                .records(kind)
                .iter()
                .filter_map(|record| record["id"].as_u64())
                .collect::<BTreeSet<_>>();
            assert_eq!(ids.len(), dataset.records(kind).len(), "{kind:?}");
        }
    }

    #[test]
    fn leaderboard_is_sorted_by_points_descending() {
        let dataset = demo_dataset();
        let points = dataset
            .leaderboard
            .iter()
            .filter_map(|entry| entry["points"].as_i64())
            .collect::<Vec<_>>();
        assert!(!points.is_empty());
        assert!(points.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn leaderboard_points_total_activity_minutes() {
        let dataset = FitnessFaker::new(7).dataset(20);
        let minutes: i64 = dataset
            .activities
            .iter()
            .filter_map(|activity| activity["duration"].as_i64())
            .sum();
        let points: i64 = dataset
            .leaderboard
            .iter()
            .filter_map(|entry| entry["points"].as_i64())
            .sum();
        assert_eq!(minutes, points);
    }

    #[test]
    fn body_shapes_mix_paginated_and_bare_arrays() {
        let dataset = demo_dataset();
        let activities = dataset.body(ResourceKind::Activities);
        assert_eq!(
            activities["count"].as_u64(),
            Some(dataset.activities.len() as u64)
        );
        assert!(activities["results"].is_array());
        assert!(dataset.body(ResourceKind::Users).is_array());
    }

    #[test]
    fn mock_api_serves_canned_responses_in_order() -> Result<()> {
        let api = MockApi::serve(vec![
            MockResponse::json(&json!([{"id": 1}])),
            MockResponse::status(500),
        ])?;
        let addr = api
            .base_url()
            .trim_start_matches("http://")
            .trim_end_matches("/api")
            .to_owned();

        let first = raw_get(&addr, "/api/teams/")?;
        assert!(first.starts_with("HTTP/1.1 200"));
        assert!(first.contains(r#"[{"id":1}]"#));

        let second = raw_get(&addr, "/api/users/")?;
        assert!(second.starts_with("HTTP/1.1 500"));

        assert_eq!(api.finish()?, vec!["/api/teams/", "/api/users/"]);
        Ok(())
    }

    fn raw_get(addr: &str, path: &str) -> Result<String> {
        let mut stream = TcpStream::connect(addr)?;
        write!(
            stream,
            "GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n"
        )?;
        let mut response = String::new();
        stream.read_to_string(&mut response)?;
        Ok(response)
    }
}
