#![allow(dead_code)]

use teamql::prelude::*;

/// An in-memory session seeded with two teams of two members each:
///
/// | team  | member  | age |
/// |-------|---------|-----|
/// | teamA | member1 | 10  |
/// | teamA | member2 | 20  |
/// | teamB | member3 | 30  |
/// | teamB | member4 | 40  |
///
/// The identity map starts out empty.
pub struct Fixture {
    pub session: Session,
    pub team_a: Team,
    pub team_b: Team,
}

pub fn setup() -> Fixture {
    let mut session = Session::open_in_memory().expect("open in-memory session");
    session.create_schema().expect("create schema");

    let mut team_a = Team::new("teamA");
    let mut team_b = Team::new("teamB");
    session.persist(&mut team_a).expect("persist teamA");
    session.persist(&mut team_b).expect("persist teamB");

    for (username, age, team) in [
        ("member1", 10, &team_a),
        ("member2", 20, &team_a),
        ("member3", 30, &team_b),
        ("member4", 40, &team_b),
    ] {
        let mut member = Member::with_team(username, age, team);
        session.persist(&mut member).expect("persist member");
    }

    session.clear();
    Fixture {
        session,
        team_a,
        team_b,
    }
}

/// Persists `member` and returns it with its id assigned.
pub fn add(session: &mut Session, mut member: Member) -> Member {
    session.persist(&mut member).expect("persist member");
    member
}

pub fn usernames(members: &[Member]) -> Vec<Option<&str>> {
    members.iter().map(Member::username).collect()
}
