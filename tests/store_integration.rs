//! # Store Integration Tests
//!
//! Exercises `FrecencyStore` end to end against real segment and checkpoint
//! files in a temp directory:
//!
//! 1. Scoring: unseen paths, first visit, accumulation, decay
//! 2. Capacity: eviction of the globally lowest entry
//! 3. Deletion outcomes
//! 4. Ranking order of `list`
//! 5. Lifecycle: idempotent init, shutdown, reattachment, cold start
//! 6. Sharing: two handles on one segment see each other's writes

use std::path::PathBuf;

use frecstore::config::MAX_ENTRIES;
use frecstore::persistence;
use frecstore::score;
use frecstore::{DeleteOutcome, FrecencyStore};
use tempfile::{tempdir, TempDir};

const NOW: f64 = 1_700_000_000.0;
const DAY: f64 = 86_400.0;

struct Paths {
    _dir: TempDir,
    segment: PathBuf,
    data: PathBuf,
}

fn paths() -> Paths {
    let dir = tempdir().unwrap();
    Paths {
        segment: dir.path().join("frecency.shm"),
        data: dir.path().join("data/frecency.txt"),
        _dir: dir,
    }
}

fn open(paths: &Paths) -> FrecencyStore {
    let mut store = FrecencyStore::builder()
        .segment_path(&paths.segment)
        .data_path(&paths.data)
        .build();
    assert!(store.init(), "store SHOULD initialize in a temp dir");
    store
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9 * expected.abs().max(1.0),
        "expected {expected}, got {actual}"
    );
}

mod scoring {
    use super::*;

    #[test]
    fn unseen_path_scores_zero() {
        let paths = paths();
        let mut store = open(&paths);
        store.visit_at("/seen", 1.0, NOW);

        assert_eq!(store.get_at("/never", NOW), 0.0);
    }

    #[test]
    fn first_visit_scores_its_value() {
        let paths = paths();
        let mut store = open(&paths);

        store.visit_at("/a", 3.5, NOW);

        assert_close(store.get_at("/a", NOW), 3.5);
    }

    #[test]
    fn default_visit_scores_one() {
        let paths = paths();
        let mut store = open(&paths);

        store.visit("/a");

        let score = store.get("/a");
        assert!(score <= 1.0 && score > 0.999_999, "got {score}");
    }

    #[test]
    fn visits_accumulate() {
        let paths = paths();
        let mut store = open(&paths);

        store.visit_at("/a", 2.0, NOW);
        store.visit_at("/a", 5.0, NOW);

        assert_close(store.get_at("/a", NOW), 7.0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn later_visit_adds_to_decayed_score() {
        let paths = paths();
        let mut store = open(&paths);

        store.visit_at("/a", 4.0, NOW);
        store.visit_at("/a", 1.0, NOW + 30.0 * DAY);

        assert_close(store.get_at("/a", NOW + 30.0 * DAY), 3.0);
    }

    #[test]
    fn score_decays_without_visits() {
        let paths = paths();
        let mut store = open(&paths);
        store.visit_at("/a", 10.0, NOW);

        let mut previous = store.get_at("/a", NOW);
        for step in 1..=50 {
            let current = store.get_at("/a", NOW + step as f64 * 7.0 * DAY);
            assert!(current < previous, "score SHOULD strictly decrease");
            assert!(current > 0.0, "score SHOULD never reach zero");
            previous = current;
        }
    }

    #[test]
    fn score_halves_every_thirty_days() {
        let paths = paths();
        let mut store = open(&paths);
        store.visit_at("/a", 8.0, NOW);

        assert_close(store.get_at("/a", NOW + 30.0 * DAY), 4.0);
        assert_close(store.get_at("/a", NOW + 60.0 * DAY), 2.0);
    }

    #[test]
    fn long_paths_share_a_truncated_key() {
        let paths = paths();
        let mut store = open(&paths);
        let mut long_a = vec![b'd'; 255];
        long_a.extend_from_slice(b"/tail-a");
        let mut long_b = vec![b'd'; 255];
        long_b.extend_from_slice(b"/tail-b");

        store.visit_at(&long_a, 1.0, NOW);
        store.visit_at(&long_b, 1.0, NOW);

        assert_eq!(store.len(), 1);
        assert_close(store.get_at(&long_a, NOW), 2.0);
    }
}

mod capacity {
    use super::*;

    #[test]
    fn full_table_evicts_lowest_scored_entry() {
        let paths = paths();
        let mut store = open(&paths);

        for i in 0..MAX_ENTRIES {
            let value = if i == 777 { 0.25 } else { 1.0 + (i % 13) as f64 };
            store.visit_at(format!("/dir/{i}"), value, NOW);
        }
        assert_eq!(store.len(), MAX_ENTRIES);

        store.visit_at("/dir/newcomer", 1.0, NOW);

        assert_eq!(store.len(), MAX_ENTRIES);
        assert_eq!(store.get_at("/dir/777", NOW), 0.0);
        assert_close(store.get_at("/dir/newcomer", NOW), 1.0);
        assert_close(store.get_at("/dir/0", NOW), 1.0);
    }

    #[test]
    fn eviction_uses_scores_at_visit_time() {
        let paths = paths();
        let mut store = open(&paths);

        store.visit_at("/old-but-big", 100.0, NOW - 400.0 * DAY);
        for i in 1..MAX_ENTRIES {
            store.visit_at(format!("/p{i}"), 1.0, NOW);
        }

        store.visit_at("/fresh", 1.0, NOW);

        assert_eq!(store.get_at("/old-but-big", NOW), 0.0);
        assert_eq!(store.len(), MAX_ENTRIES);
    }
}

mod deletion {
    use super::*;

    #[test]
    fn del_existing_entry() {
        let paths = paths();
        let mut store = open(&paths);
        store.visit_at("/a", 1.0, NOW);
        store.visit_at("/b", 1.0, NOW);

        assert_eq!(store.del("/a"), DeleteOutcome::Deleted);

        assert_eq!(store.get_at("/a", NOW), 0.0);
        assert_eq!(store.len(), 1);
        assert_close(store.get_at("/b", NOW), 1.0);
    }

    #[test]
    fn del_missing_entry_leaves_count() {
        let paths = paths();
        let mut store = open(&paths);
        store.visit_at("/a", 1.0, NOW);

        assert_eq!(store.del("/zzz"), DeleteOutcome::NotFound);

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn del_after_shutdown_reports_not_initialized() {
        let paths = paths();
        let mut store = open(&paths);
        store.visit_at("/a", 1.0, NOW);
        store.shutdown();

        assert_eq!(store.del("/a"), DeleteOutcome::NotInitialized);
    }
}

mod ranking {
    use super::*;

    #[test]
    fn list_two_returns_top_scores_in_order() {
        let paths = paths();
        let mut store = open(&paths);
        store.visit_at("a", 5.0, NOW);
        store.visit_at("b", 1.0, NOW);
        store.visit_at("c", 9.0, NOW);

        let top = store.list_at(Some(2), NOW);

        let names: Vec<&[u8]> = top.iter().map(|s| s.path.as_slice()).collect();
        assert_eq!(names, vec![b"c".as_slice(), b"a".as_slice()]);
        assert_close(top[0].score, 9.0);
        assert_close(top[1].score, 5.0);
    }

    #[test]
    fn list_without_limit_returns_everything() {
        let paths = paths();
        let mut store = open(&paths);
        for (i, value) in [3.0, 1.0, 2.0, 4.0].iter().enumerate() {
            store.visit_at(format!("/p{i}"), *value, NOW);
        }

        let all = store.list_at(None, NOW);

        let scores: Vec<f64> = all.iter().map(|s| s.score.round()).collect();
        assert_eq!(scores, vec![4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn list_limit_beyond_len_is_fine() {
        let paths = paths();
        let mut store = open(&paths);
        store.visit_at("/only", 1.0, NOW);

        assert_eq!(store.list_at(Some(50), NOW).len(), 1);
        assert!(store.list_at(Some(0), NOW).is_empty());
    }

    #[test]
    fn equal_scores_list_deterministically() {
        let paths = paths();
        let mut store = open(&paths);
        for name in ["/x", "/y", "/z"] {
            store.visit_at(name, 1.0, NOW);
        }

        let first = store.list_at(None, NOW);
        let second = store.list_at(None, NOW);

        assert_eq!(first, second);
    }
}

mod lifecycle {
    use super::*;

    #[test]
    fn init_twice_keeps_entries() {
        let paths = paths();
        let mut store = open(&paths);
        store.visit_at("/a", 1.0, NOW);

        assert!(store.init());

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn shutdown_writes_checkpoint_and_detaches() {
        let paths = paths();
        let mut store = open(&paths);
        store.visit_at("/a b", 2.0, NOW);

        store.shutdown();

        assert!(!store.is_initialized());
        assert_eq!(store.get_at("/a b", NOW), 0.0);
        let text = std::fs::read_to_string(&paths.data).unwrap();
        assert!(text.starts_with("4 /a b "), "got {text:?}");
    }

    #[test]
    fn reinit_after_shutdown_reattaches_live_segment() {
        let paths = paths();
        let mut store = open(&paths);
        store.visit_at("/a", 2.0, NOW);
        store.shutdown();
        std::fs::remove_file(&paths.data).unwrap();

        assert!(store.init());

        assert_close(store.get_at("/a", NOW), 2.0);
    }

    #[test]
    fn cold_start_hydrates_from_checkpoint() {
        let paths = paths();
        {
            let mut store = open(&paths);
            store.visit_at("/kept", 6.0, NOW);
            store.visit_at("/also kept", 2.0, NOW);
            store.shutdown();
        }
        std::fs::remove_file(&paths.segment).unwrap();

        let store = open(&paths);

        assert_eq!(store.len(), 2);
        assert!((store.get_at("/kept", NOW) - 6.0).abs() < 1e-5);
        assert!((store.get_at("/also kept", NOW) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn cold_start_skips_malformed_checkpoint_lines() {
        let paths = paths();
        std::fs::create_dir_all(paths.data.parent().unwrap()).unwrap();
        let deadline = score::to_deadline(3.0, NOW);
        std::fs::write(
            &paths.data,
            format!("not a record\n2 /a {deadline:.6}\n2 /b oops\n"),
        )
        .unwrap();

        let store = open(&paths);

        assert_eq!(store.len(), 1);
        assert!((store.get_at("/a", NOW) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn save_failure_keeps_live_table() {
        let paths = paths();
        std::fs::create_dir_all(&paths.data).unwrap();
        let mut store = open(&paths);
        store.visit_at("/a", 1.0, NOW);

        assert!(!store.save());

        assert_close(store.get_at("/a", NOW), 1.0);
    }

    #[test]
    fn sync_flushes_segment() {
        let paths = paths();
        let mut store = open(&paths);
        store.visit_at("/a", 1.0, NOW);

        assert!(store.sync());
    }

    #[test]
    fn checkpoint_round_trip_matches_scores_at_save() {
        let paths = paths();
        let mut store = open(&paths);
        for (name, value) in [("/a", 5.0), ("/b", 1.0), ("/c", 9.0), ("/d", 2.5)] {
            store.visit_at(name, value, NOW);
        }
        store.del("/b");
        let before = store.list_at(None, NOW);
        assert!(store.save());
        store.shutdown();
        std::fs::remove_file(&paths.segment).unwrap();

        let store = open(&paths);
        let after = store.list_at(None, NOW);

        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(b.path, a.path);
            assert!((b.score - a.score).abs() < 1e-5);
        }
    }
}

mod sharing {
    use super::*;

    #[test]
    fn second_handle_sees_first_handles_visits() {
        let paths = paths();
        let mut first = open(&paths);
        first.visit_at("/from-first", 4.0, NOW);

        let mut second = open(&paths);
        assert_close(second.get_at("/from-first", NOW), 4.0);

        second.visit_at("/from-first", 1.0, NOW);
        assert_close(first.get_at("/from-first", NOW), 5.0);
    }

    #[test]
    fn attaching_to_live_segment_ignores_checkpoint() {
        let paths = paths();
        let mut first = open(&paths);
        first.visit_at("/live", 1.0, NOW);

        std::fs::create_dir_all(paths.data.parent().unwrap()).unwrap();
        let mut stale = Vec::new();
        persistence::encode_record(&mut stale, b"/stale", score::to_deadline(1.0, NOW));
        std::fs::write(&paths.data, stale).unwrap();

        let second = open(&paths);

        assert_eq!(second.len(), 1);
        assert_eq!(second.get_at("/stale", NOW), 0.0);
    }

    #[test]
    fn delete_in_one_handle_is_visible_in_other() {
        let paths = paths();
        let mut first = open(&paths);
        let mut second = open(&paths);
        first.visit_at("/gone", 1.0, NOW);

        assert_eq!(second.del("/gone"), DeleteOutcome::Deleted);

        assert_eq!(first.get_at("/gone", NOW), 0.0);
        assert_eq!(first.len(), 0);
    }
}
