mod common;

use chrono::NaiveDate;
use common::{at, at_on, open_test_pool, register};
use fixtrack::config::Config;
use fixtrack::core::agents::AgentLogic;
use fixtrack::core::checkpoint::{CheckpointLogic, ShopVisit};
use fixtrack::core::day::DayLogic;
use fixtrack::core::duty::DutyLogic;
use fixtrack::core::pinger::PingLogic;
use fixtrack::core::session_guard::SessionGuard;
use fixtrack::core::sweep::SweepLogic;
use fixtrack::db::log::load_log;
use fixtrack::db::pool::DbPool;
use fixtrack::db::queries::load_agent;
use fixtrack::db::trail::count_checkpoints;
use fixtrack::errors::{AppError, AppResult};
use fixtrack::media::{PhotoStore, PhotoUpload};
use fixtrack::models::checkpoint::{CheckpointDetail, CheckpointKind};
use fixtrack::models::coordinate::Coordinate;
use fixtrack::models::duty_status::DutyStatus;
use std::cell::Cell;

fn pos(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).unwrap()
}

fn sep_1() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
}

/// Accepts every upload and counts calls.
#[derive(Default)]
struct CountingStore {
    calls: Cell<usize>,
}

impl PhotoStore for CountingStore {
    fn upload(&self, agent_id: i64, _photo: &PhotoUpload) -> AppResult<String> {
        self.calls.set(self.calls.get() + 1);
        Ok(format!("https://media.test/{agent_id}/{}.jpg", self.calls.get()))
    }
}

struct FailingStore;

impl PhotoStore for FailingStore {
    fn upload(&self, _agent_id: i64, _photo: &PhotoUpload) -> AppResult<String> {
        Err(AppError::Upload("storage offline".into()))
    }
}

fn visit(shop: &str, photo: Option<PhotoUpload>) -> ShopVisit {
    ShopVisit {
        shop_name: shop.to_string(),
        position: Some(pos(28.61, 77.20)),
        note: Some("  collected order  ".into()),
        photo,
    }
}

fn photo() -> PhotoUpload {
    PhotoUpload::new("front.jpg", vec![1, 2, 3])
}

// ---------------------------
// Session guard
// ---------------------------

#[test]
fn guard_resolves_token_and_rejects_bad_credentials() {
    let mut pool = open_test_pool("guard_basic");
    let (agent, token) = register(&mut pool, "Ravi");

    let resolved = SessionGuard::authenticate(&pool.conn, Some(token.as_str())).unwrap();
    assert_eq!(resolved.id, agent.id);

    let bearer = format!("Bearer {token}");
    assert_eq!(
        SessionGuard::authenticate(&pool.conn, Some(bearer.as_str())).unwrap().id,
        agent.id
    );

    for bad in [None, Some(""), Some("   "), Some("nope")] {
        assert!(matches!(
            SessionGuard::authenticate(&pool.conn, bad),
            Err(AppError::Unauthorized(_))
        ));
    }
}

#[test]
fn guard_rejects_deactivated_and_rotated_tokens() {
    let mut pool = open_test_pool("guard_deactivated");
    let (agent, token) = register(&mut pool, "Meena");

    let fresh = AgentLogic::rotate_token(&mut pool, agent.id, at(8, 0)).unwrap();
    assert!(matches!(
        SessionGuard::authenticate(&pool.conn, Some(token.as_str())),
        Err(AppError::Unauthorized(_))
    ));
    assert!(SessionGuard::authenticate(&pool.conn, Some(fresh.as_str())).is_ok());

    AgentLogic::deactivate(&mut pool, agent.id).unwrap();
    assert!(matches!(
        SessionGuard::authenticate(&pool.conn, Some(fresh.as_str())),
        Err(AppError::Unauthorized(_))
    ));

    // Deactivated agents are hidden by default but never deleted.
    assert!(AgentLogic::list(&pool, false).unwrap().is_empty());
    assert_eq!(AgentLogic::list(&pool, true).unwrap().len(), 1);
}

#[test]
fn register_rejects_blank_name() {
    let mut pool = open_test_pool("register_blank");
    assert!(matches!(
        AgentLogic::register(&mut pool, "   ", at(7, 0)),
        Err(AppError::Validation(_))
    ));
}

// ---------------------------
// Duty state
// ---------------------------

#[test]
fn start_duty_sets_status_and_appends_one_checkpoint() {
    let mut pool = open_test_pool("duty_start");
    let (agent, _) = register(&mut pool, "Ravi");

    let t = DutyLogic::start(&mut pool, &agent, pos(10.0, 20.0), at(9, 0)).unwrap();
    assert!(t.changed());
    assert_eq!(t.previous, DutyStatus::OffDuty);

    let stored = load_agent(&pool.conn, agent.id).unwrap();
    assert_eq!(stored.status, DutyStatus::OnDuty);
    assert_eq!(stored.duty_started_at, Some(at(9, 0)));
    assert_eq!(stored.duty_start_position, Some(pos(10.0, 20.0)));
    assert_eq!(stored.last_position, Some(pos(10.0, 20.0)));

    let view = DayLogic::view(&pool, agent.id, sep_1()).unwrap();
    assert_eq!(view.checkpoints.len(), 1);
    assert_eq!(view.checkpoints[0].kind(), CheckpointKind::DutyStart);
    assert_eq!(view.checkpoints[0].position, pos(10.0, 20.0));
}

#[test]
fn end_duty_without_start_is_accepted() {
    let mut pool = open_test_pool("duty_end_orphan");
    let (agent, _) = register(&mut pool, "Ravi");

    let t = DutyLogic::end(&mut pool, &agent, pos(10.0, 25.0), at(18, 0)).unwrap();
    assert!(!t.changed());
    assert_eq!(t.current, DutyStatus::OffDuty);
    assert_eq!(
        t.checkpoint.detail,
        CheckpointDetail::DutyEnd { auto_closed: false }
    );
    assert_eq!(count_checkpoints(&pool.conn, agent.id).unwrap(), 1);
}

#[test]
fn repeated_start_still_appends_checkpoints() {
    let mut pool = open_test_pool("duty_restart");
    let (agent, _) = register(&mut pool, "Ravi");

    DutyLogic::start(&mut pool, &agent, pos(10.0, 20.0), at(9, 0)).unwrap();
    let again = DutyLogic::start(&mut pool, &agent, pos(10.0, 20.1), at(9, 5)).unwrap();

    assert!(!again.changed());
    assert_eq!(count_checkpoints(&pool.conn, agent.id).unwrap(), 2);
    let stored = load_agent(&pool.conn, agent.id).unwrap();
    assert_eq!(stored.duty_started_at, Some(at(9, 5)));
}

#[test]
fn start_then_end_yields_two_checkpoints_in_order() {
    let mut pool = open_test_pool("duty_start_end");
    let (agent, _) = register(&mut pool, "Ravi");

    DutyLogic::start(&mut pool, &agent, pos(10.0, 20.0), at(9, 0)).unwrap();
    DutyLogic::end(&mut pool, &agent, pos(10.0, 25.0), at(17, 30)).unwrap();

    let view = DayLogic::view(&pool, agent.id, sep_1()).unwrap();
    let kinds: Vec<CheckpointKind> = view.checkpoints.iter().map(|c| c.kind()).collect();
    assert_eq!(kinds, vec![CheckpointKind::DutyStart, CheckpointKind::DutyEnd]);

    let summary = DayLogic::summarize(&view);
    assert_eq!(summary.sessions.len(), 1);
    assert_eq!(summary.on_duty_minutes, 8 * 60 + 30);

    let stored = load_agent(&pool.conn, agent.id).unwrap();
    assert_eq!(stored.status, DutyStatus::OffDuty);
    assert_eq!(stored.duty_end_position, Some(pos(10.0, 25.0)));
}

#[test]
fn duty_for_missing_agent_is_not_found() {
    let mut pool = open_test_pool("duty_missing_agent");
    let (mut agent, _) = register(&mut pool, "Ravi");
    agent.id = 999;

    assert!(matches!(
        DutyLogic::start(&mut pool, &agent, pos(1.0, 1.0), at(9, 0)),
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        PingLogic::ping(&mut pool, &agent, pos(1.0, 1.0), at(9, 0), &Config::default()),
        Err(AppError::NotFound(_))
    ));
}

// ---------------------------
// Location pinger
// ---------------------------

#[test]
fn pings_update_last_known_position_and_come_back_in_order() {
    let mut pool = open_test_pool("ping_order");
    let (agent, _) = register(&mut pool, "Ravi");
    let cfg = Config::default();

    for (i, min) in [0, 1, 2].into_iter().enumerate() {
        let p = pos(10.0 + i as f64 * 0.001, 20.0);
        PingLogic::ping(&mut pool, &agent, p, at(9, min), &cfg).unwrap();

        let stored = load_agent(&pool.conn, agent.id).unwrap();
        assert_eq!(stored.last_position, Some(p));
        assert_eq!(stored.last_seen_at, Some(at(9, min)));
    }

    let view = DayLogic::view(&pool, agent.id, sep_1()).unwrap();
    assert_eq!(view.samples.len(), 3);
    let lats: Vec<f64> = view.samples.iter().map(|s| s.position.lat).collect();
    assert!(lats.windows(2).all(|w| w[0] < w[1]));
    assert!(view.samples.windows(2).all(|w| w[0].recorded_at < w[1].recorded_at));
}

#[test]
fn ping_forces_on_duty_unless_disabled() {
    let mut pool = open_test_pool("ping_resumes");
    let (agent, _) = register(&mut pool, "Ravi");

    let mut cfg = Config::default();
    cfg.ping_resumes_duty = false;
    PingLogic::ping(&mut pool, &agent, pos(1.0, 1.0), at(9, 0), &cfg).unwrap();
    assert_eq!(
        load_agent(&pool.conn, agent.id).unwrap().status,
        DutyStatus::OffDuty
    );

    cfg.ping_resumes_duty = true;
    PingLogic::ping(&mut pool, &agent, pos(1.0, 1.0), at(9, 1), &cfg).unwrap();
    assert_eq!(
        load_agent(&pool.conn, agent.id).unwrap().status,
        DutyStatus::OnDuty
    );
}

#[test]
fn ping_resume_follows_stored_status_not_callers_copy() {
    let mut pool = open_test_pool("ping_resume_stale");
    let (off_copy, _) = register(&mut pool, "Ravi");
    let cfg = Config::default();
    let resumes = |pool: &DbPool| {
        load_log(&pool.conn)
            .unwrap()
            .iter()
            .filter(|e| e.operation == "ping_resume")
            .count()
    };

    // Stored ON_DUTY, caller still holds the OFF_DUTY copy: nothing resumes.
    let started = DutyLogic::start(&mut pool, &off_copy, pos(1.0, 1.0), at(9, 0)).unwrap();
    assert_eq!(started.current, DutyStatus::OnDuty);
    PingLogic::ping(&mut pool, &off_copy, pos(1.0, 1.1), at(9, 1), &cfg).unwrap();
    assert_eq!(resumes(&pool), 0);

    // Stored OFF_DUTY, caller holds an ON_DUTY copy: the ping resumes duty.
    let on_agent = load_agent(&pool.conn, off_copy.id).unwrap();
    DutyLogic::end(&mut pool, &on_agent, pos(1.0, 1.2), at(9, 2)).unwrap();
    PingLogic::ping(&mut pool, &on_agent, pos(1.0, 1.3), at(9, 3), &cfg).unwrap();
    assert_eq!(resumes(&pool), 1);
    assert_eq!(
        load_agent(&pool.conn, on_agent.id).unwrap().status,
        DutyStatus::OnDuty
    );
}

#[test]
fn out_of_order_pings_are_stored_and_sorted_on_read() {
    let mut pool = open_test_pool("ping_out_of_order");
    let (agent, _) = register(&mut pool, "Ravi");
    let cfg = Config::default();

    PingLogic::ping(&mut pool, &agent, pos(3.0, 3.0), at(9, 2), &cfg).unwrap();
    PingLogic::ping(&mut pool, &agent, pos(1.0, 1.0), at(9, 0), &cfg).unwrap();
    PingLogic::ping(&mut pool, &agent, pos(1.0, 1.0), at(9, 0), &cfg).unwrap();

    let view = DayLogic::view(&pool, agent.id, sep_1()).unwrap();
    assert_eq!(view.samples.len(), 3);
    assert_eq!(view.samples[0].recorded_at, at(9, 0));
    assert_eq!(view.samples[2].recorded_at, at(9, 2));
}

// ---------------------------
// Checkpoint recorder
// ---------------------------

#[test]
fn shop_visit_uploads_photo_and_appends_checkpoint() {
    let mut pool = open_test_pool("visit_ok");
    let (agent, _) = register(&mut pool, "Ravi");
    let store = CountingStore::default();

    let cp = CheckpointLogic::record_shop_visit(
        &mut pool,
        &store,
        &agent,
        visit("Gupta Traders", Some(photo())),
        at(11, 15),
    )
    .unwrap();

    assert_eq!(store.calls.get(), 1);
    assert_eq!(cp.kind(), CheckpointKind::ShopVisit);
    assert_eq!(cp.shop_name(), Some("Gupta Traders"));
    assert_eq!(cp.note.as_deref(), Some("collected order"));
    assert_eq!(
        cp.photo_url(),
        Some(format!("https://media.test/{}/1.jpg", agent.id).as_str())
    );

    let view = DayLogic::view(&pool, agent.id, sep_1()).unwrap();
    assert_eq!(view.checkpoints.len(), 1);
    assert_eq!(view.checkpoints[0].photo_url(), cp.photo_url());
}

#[test]
fn shop_visit_without_photo_is_rejected_and_writes_nothing() {
    let mut pool = open_test_pool("visit_no_photo");
    let (agent, _) = register(&mut pool, "Ravi");
    let store = CountingStore::default();

    let err = CheckpointLogic::record_shop_visit(
        &mut pool,
        &store,
        &agent,
        visit("Gupta Traders", None),
        at(11, 15),
    )
    .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(store.calls.get(), 0);
    assert_eq!(count_checkpoints(&pool.conn, agent.id).unwrap(), 0);
}

#[test]
fn shop_visit_validates_name_coordinates_and_empty_photo() {
    let mut pool = open_test_pool("visit_validation");
    let (agent, _) = register(&mut pool, "Ravi");
    let store = CountingStore::default();

    let blank_name = visit("  ", Some(photo()));
    let mut no_coords = visit("Shop", Some(photo()));
    no_coords.position = None;
    let mut bad_coords = visit("Shop", Some(photo()));
    bad_coords.position = Some(Coordinate { lat: 95.0, lng: 0.0 });
    let empty_photo = visit("Shop", Some(PhotoUpload::new("x.jpg", vec![])));

    for v in [blank_name, no_coords, bad_coords, empty_photo] {
        let err =
            CheckpointLogic::record_shop_visit(&mut pool, &store, &agent, v, at(12, 0)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
    }

    assert_eq!(store.calls.get(), 0);
    assert_eq!(count_checkpoints(&pool.conn, agent.id).unwrap(), 0);
}

#[test]
fn failed_upload_is_upload_error_and_writes_nothing() {
    let mut pool = open_test_pool("visit_upload_fail");
    let (agent, _) = register(&mut pool, "Ravi");

    let err = CheckpointLogic::record_shop_visit(
        &mut pool,
        &FailingStore,
        &agent,
        visit("Gupta Traders", Some(photo())),
        at(11, 15),
    )
    .unwrap_err();

    assert!(matches!(err, AppError::Upload(_)));
    assert_eq!(count_checkpoints(&pool.conn, agent.id).unwrap(), 0);
}

// ---------------------------
// Day reconstructor
// ---------------------------

#[test]
fn day_view_only_returns_rows_inside_the_day_window() {
    let mut pool = open_test_pool("day_window");
    let (agent, _) = register(&mut pool, "Ravi");
    let cfg = Config::default();

    PingLogic::ping(&mut pool, &agent, pos(1.0, 1.0), at_on(2025, 8, 31, 23, 59), &cfg).unwrap();
    PingLogic::ping(&mut pool, &agent, pos(2.0, 2.0), at_on(2025, 9, 1, 0, 0), &cfg).unwrap();
    PingLogic::ping(&mut pool, &agent, pos(3.0, 3.0), at_on(2025, 9, 1, 23, 59), &cfg).unwrap();
    PingLogic::ping(&mut pool, &agent, pos(4.0, 4.0), at_on(2025, 9, 2, 0, 0), &cfg).unwrap();
    DutyLogic::end(&mut pool, &agent, pos(4.0, 4.0), at_on(2025, 9, 2, 0, 1)).unwrap();

    let view = DayLogic::view(&pool, agent.id, sep_1()).unwrap();
    let lats: Vec<f64> = view.samples.iter().map(|s| s.position.lat).collect();
    assert_eq!(lats, vec![2.0, 3.0]);
    assert!(view.checkpoints.is_empty());

    let next = DayLogic::view(&pool, agent.id, sep_1().succ_opt().unwrap()).unwrap();
    assert_eq!(next.samples.len(), 1);
    assert_eq!(next.checkpoints.len(), 1);
}

#[test]
fn day_view_is_partitioned_by_agent() {
    let mut pool = open_test_pool("day_agents");
    let (a, _) = register(&mut pool, "Ravi");
    let (b, _) = register(&mut pool, "Meena");
    let cfg = Config::default();

    PingLogic::ping(&mut pool, &a, pos(1.0, 1.0), at(9, 0), &cfg).unwrap();
    PingLogic::ping(&mut pool, &b, pos(2.0, 2.0), at(9, 0), &cfg).unwrap();
    DutyLogic::start(&mut pool, &b, pos(2.0, 2.0), at(9, 0)).unwrap();

    let view_a = DayLogic::view(&pool, a.id, sep_1()).unwrap();
    assert_eq!(view_a.samples.len(), 1);
    assert!(view_a.checkpoints.is_empty());
    assert!(view_a.samples.iter().all(|s| s.agent_id == a.id));
}

#[test]
fn day_view_of_unknown_agent_is_not_found() {
    let pool = open_test_pool("day_unknown");
    assert!(matches!(
        DayLogic::view(&pool, 42, sep_1()),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn day_summary_counts_distance_and_visits() {
    let mut pool = open_test_pool("day_summary");
    let (agent, _) = register(&mut pool, "Ravi");
    let cfg = Config::default();
    let store = CountingStore::default();

    DutyLogic::start(&mut pool, &agent, pos(10.0, 20.0), at(9, 0)).unwrap();
    PingLogic::ping(&mut pool, &agent, pos(10.0, 20.0), at(9, 1), &cfg).unwrap();
    PingLogic::ping(&mut pool, &agent, pos(10.01, 20.0), at(9, 2), &cfg).unwrap();
    CheckpointLogic::record_shop_visit(
        &mut pool,
        &store,
        &agent,
        visit("Gupta Traders", Some(photo())),
        at(9, 30),
    )
    .unwrap();

    let view = DayLogic::view(&pool, agent.id, sep_1()).unwrap();
    let summary = DayLogic::summarize(&view);

    assert_eq!(summary.sample_count, 2);
    assert_eq!(summary.shop_visits, 1);
    assert!((summary.distance_m - 1_112.0).abs() < 5.0);
    assert_eq!(summary.sessions.len(), 1);
    assert!(summary.sessions[0].is_open());
}

// ---------------------------
// Stale-session sweep
// ---------------------------

#[test]
fn sweep_auto_ends_silent_agents_only() {
    let mut pool = open_test_pool("sweep");
    let (silent, _) = register(&mut pool, "Ravi");
    let (busy, _) = register(&mut pool, "Meena");
    let (off, _) = register(&mut pool, "Arjun");
    let cfg = Config::default();

    DutyLogic::start(&mut pool, &silent, pos(10.0, 20.0), at(9, 0)).unwrap();
    PingLogic::ping(&mut pool, &silent, pos(10.1, 20.0), at(9, 10), &cfg).unwrap();
    DutyLogic::start(&mut pool, &busy, pos(11.0, 21.0), at(9, 0)).unwrap();
    PingLogic::ping(&mut pool, &busy, pos(11.0, 21.0), at(10, 55), &cfg).unwrap();
    DutyLogic::end(&mut pool, &off, pos(12.0, 22.0), at(8, 0)).unwrap();

    assert!(SweepLogic::expire_stale(&mut pool, at(11, 0), 0).unwrap().closed.is_empty());

    let report = SweepLogic::expire_stale(&mut pool, at(11, 0), 30).unwrap();
    assert_eq!(report.closed, vec![silent.id]);
    assert!(report.failed.is_empty());

    let stored = load_agent(&pool.conn, silent.id).unwrap();
    assert_eq!(stored.status, DutyStatus::OffDuty);
    assert_eq!(stored.duty_end_position, Some(pos(10.1, 20.0)));

    let view = DayLogic::view(&pool, silent.id, sep_1()).unwrap();
    let last = view.checkpoints.last().unwrap();
    assert_eq!(last.detail, CheckpointDetail::DutyEnd { auto_closed: true });
    assert_eq!(last.recorded_at, at(9, 10));

    assert_eq!(
        load_agent(&pool.conn, busy.id).unwrap().status,
        DutyStatus::OnDuty
    );

    // A second sweep finds nothing left to close.
    assert!(SweepLogic::expire_stale(&mut pool, at(11, 0), 30).unwrap().closed.is_empty());
}

#[test]
fn sweep_keeps_going_when_one_agent_fails() {
    let mut pool = open_test_pool("sweep_partial");
    let (broken, _) = register(&mut pool, "Ravi");
    let (fine, _) = register(&mut pool, "Meena");

    DutyLogic::start(&mut pool, &broken, pos(10.0, 20.0), at(9, 0)).unwrap();
    DutyLogic::start(&mut pool, &fine, pos(11.0, 21.0), at(9, 0)).unwrap();

    // Any further checkpoint for the first agent is refused by the store.
    pool.conn
        .execute_batch(&format!(
            "CREATE TRIGGER refuse_checkpoint BEFORE INSERT ON checkpoints
             WHEN NEW.agent_id = {}
             BEGIN SELECT RAISE(ABORT, 'checkpoint refused'); END;",
            broken.id
        ))
        .unwrap();

    let report = SweepLogic::expire_stale(&mut pool, at(11, 0), 30).unwrap();
    assert_eq!(report.closed, vec![fine.id]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, broken.id);
    assert!(matches!(report.failed[0].1, AppError::Persistence(_)));

    // The failed agent's transaction rolled back as a whole.
    assert_eq!(
        load_agent(&pool.conn, broken.id).unwrap().status,
        DutyStatus::OnDuty
    );
    assert_eq!(
        load_agent(&pool.conn, fine.id).unwrap().status,
        DutyStatus::OffDuty
    );
}
