#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use mosaic_core::clock::{TestClock, set_clock};
    use mosaic_core::timer;
    use mosaic_core::{Composition, Promise, take_frame_request};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use web_time::Duration;

    use crate::async_state::{AsyncState, AsyncStatus, UseAsync, use_async, use_async_with};
    use crate::debounce::use_debounced_state_with;
    use crate::force_update::use_force_update;
    use crate::grid::{CELL_MAX, CellRef, Grid, regenerate_all, regenerate_cell};
    use crate::interval::Interval;

    fn install_test_clock() -> TestClock {
        let c = TestClock::starting_now();
        set_clock(Rc::new(c.clone()));
        c
    }

    fn exactly_one_flag<T: Clone + 'static, E: Clone + 'static>(t: &UseAsync<T, E>) -> bool {
        [t.is_idle(), t.is_loading(), t.is_error(), t.is_success()]
            .iter()
            .filter(|b| **b)
            .count()
            == 1
    }

    // ---- async-state tracker ----

    #[test]
    fn test_async_initial_state() {
        let mut comp = Composition::new();
        let tracker = comp.frame(use_async::<i32, String>);

        assert!(tracker.is_idle());
        assert!(exactly_one_flag(&tracker));
        assert_eq!(tracker.status(), AsyncStatus::Idle);
        assert_eq!(tracker.data(), None);
        assert_eq!(tracker.error(), None);
    }

    #[test]
    fn test_async_resolve_path() {
        let mut comp = Composition::new();
        let tracker = comp.frame(use_async::<i32, String>);

        let op: Promise<i32, String> = Promise::pending();
        tracker.run(op.clone());
        assert!(tracker.is_loading());
        assert!(exactly_one_flag(&tracker));

        op.resolve(7);
        assert!(tracker.is_success());
        assert!(exactly_one_flag(&tracker));
        assert_eq!(tracker.data(), Some(7));
        assert_eq!(tracker.error(), None);
    }

    #[test]
    fn test_async_reject_path() {
        let mut comp = Composition::new();
        let tracker = comp.frame(use_async::<i32, String>);

        let op: Promise<i32, String> = Promise::pending();
        tracker.run(op.clone());
        op.reject("boom".into());

        assert!(tracker.is_error());
        assert!(exactly_one_flag(&tracker));
        assert_eq!(tracker.error(), Some("boom".into()));
    }

    #[test]
    fn test_async_rerun_reenters_pending() {
        let mut comp = Composition::new();
        let tracker = comp.frame(use_async::<i32, String>);

        tracker.run(Promise::resolved(1));
        assert!(tracker.is_success());

        let second: Promise<i32, String> = Promise::pending();
        tracker.run(second.clone());
        assert!(tracker.is_loading());
        // data from the previous cycle survives the transition
        assert_eq!(tracker.data(), Some(1));

        second.resolve(2);
        assert_eq!(tracker.data(), Some(2));
    }

    #[test]
    fn test_async_stale_error_not_cleared_by_success() {
        let mut comp = Composition::new();
        let tracker = comp.frame(use_async::<i32, String>);

        tracker.run(Promise::rejected("first failure".into()));
        assert!(tracker.is_error());

        tracker.run(Promise::resolved(9));
        assert!(tracker.is_success());
        assert_eq!(tracker.data(), Some(9));
        // The stale error is deliberately retained.
        assert_eq!(tracker.error(), Some("first failure".into()));
    }

    #[test]
    fn test_async_set_data_and_set_error_keep_status() {
        let mut comp = Composition::new();
        let tracker = comp.frame(use_async::<i32, String>);

        tracker.set_data(5);
        assert_eq!(tracker.data(), Some(5));
        assert_eq!(tracker.status(), AsyncStatus::Idle);

        tracker.set_error("manual".into());
        assert_eq!(tracker.error(), Some("manual".into()));
        assert_eq!(tracker.status(), AsyncStatus::Idle);
        assert_eq!(tracker.data(), Some(5));
    }

    #[test]
    fn test_async_run_any_rejects_non_awaitable() {
        let mut comp = Composition::new();
        let tracker = comp.frame(use_async::<i32, String>);

        let before = tracker.state();
        let result = tracker.run_any(Box::new(42u8));
        assert!(result.is_err());
        // No state change on the synchronous failure path.
        assert_eq!(tracker.state(), before);
    }

    #[test]
    fn test_async_run_any_accepts_promise() {
        let mut comp = Composition::new();
        let tracker = comp.frame(use_async::<i32, String>);

        let op: Promise<i32, String> = Promise::resolved(3);
        let forwarded = tracker.run_any(Box::new(op));
        assert!(forwarded.is_ok());
        assert!(tracker.is_success());
        assert_eq!(tracker.data(), Some(3));
    }

    #[test]
    fn test_async_settlement_after_dispose_is_dropped() {
        let mut comp = Composition::new();
        let tracker = comp.frame(use_async::<i32, String>);

        let op: Promise<i32, String> = Promise::pending();
        tracker.run(op.clone());
        assert!(tracker.is_loading());

        comp.dispose();
        op.resolve(99);

        // The late settlement must not mutate observable state.
        assert!(tracker.is_loading());
        assert_eq!(tracker.data(), None);
    }

    #[test]
    fn test_async_reset_restores_initial_overrides() {
        let mut comp = Composition::new();
        let initial = AsyncState::with_data(10);
        let tracker = comp.frame({
            let initial = initial.clone();
            move || use_async_with::<i32, String>(initial)
        });
        assert_eq!(tracker.data(), Some(10));

        tracker.run(Promise::rejected("oops".into()));
        tracker.set_data(77);
        assert!(tracker.is_error());

        tracker.reset();
        assert_eq!(tracker.state(), initial);
        assert!(tracker.is_idle());
    }

    #[test]
    fn test_async_run_returns_forwarding_promise() {
        let mut comp = Composition::new();
        let tracker = comp.frame(use_async::<i32, String>);

        let op: Promise<i32, String> = Promise::pending();
        let forwarded = tracker.run(op.clone());

        let chained = Rc::new(Cell::new(0));
        let c = chained.clone();
        forwarded.then(move |v| c.set(v), |_| {});

        op.resolve(11);
        assert_eq!(chained.get(), 11);
    }

    #[test]
    fn test_async_handle_survives_recomposition() {
        let mut comp = Composition::new();
        let first = comp.frame(use_async::<i32, String>);
        first.run(Promise::resolved(4));

        let second = comp.frame(use_async::<i32, String>);
        assert!(second.is_success());
        assert_eq!(second.data(), Some(4));
    }

    // ---- debounced state ----

    #[test]
    fn test_debounce_trailing_edge() {
        let clock = install_test_clock();
        let mut comp = Composition::new();
        let deb =
            comp.frame(|| use_debounced_state_with(|| 0i32, Duration::from_millis(200)));

        deb.set(1);
        clock.advance(Duration::from_millis(100));
        timer::pump();
        assert_eq!(deb.get(), 0);

        // A call inside the quiet window cancels and reschedules.
        deb.set(2);
        clock.advance(Duration::from_millis(150));
        timer::pump();
        assert_eq!(deb.get(), 0);

        clock.advance(Duration::from_millis(50));
        timer::pump();
        assert_eq!(deb.get(), 2);
        assert_eq!(timer::active_timers(), 0);
    }

    #[test]
    fn test_debounce_only_last_of_burst_lands() {
        let clock = install_test_clock();
        let mut comp = Composition::new();
        let deb =
            comp.frame(|| use_debounced_state_with(|| 0i32, Duration::from_millis(200)));

        for v in 1..=5 {
            deb.set(v);
        }
        clock.advance(Duration::from_millis(200));
        timer::pump();
        assert_eq!(deb.get(), 5);
    }

    #[test]
    fn test_debounce_dispose_cancels_pending() {
        let clock = install_test_clock();
        let mut comp = Composition::new();
        let deb =
            comp.frame(|| use_debounced_state_with(|| 0i32, Duration::from_millis(200)));

        deb.set(9);
        comp.dispose();
        assert_eq!(timer::active_timers(), 0);

        clock.advance(Duration::from_millis(200));
        timer::pump();
        assert_eq!(deb.get(), 0);
    }

    #[test]
    fn test_debounce_set_after_dispose_is_dropped() {
        let clock = install_test_clock();
        let mut comp = Composition::new();
        let deb =
            comp.frame(|| use_debounced_state_with(|| 0i32, Duration::from_millis(200)));

        comp.dispose();

        // A detached handle schedules nothing and mutates nothing.
        deb.set(4);
        assert_eq!(timer::active_timers(), 0);
        clock.advance(Duration::from_millis(200));
        timer::pump();
        assert_eq!(deb.get(), 0);

        deb.set_now(5);
        assert_eq!(deb.get(), 0);
    }

    #[test]
    fn test_debounce_set_now_preempts_pending() {
        let clock = install_test_clock();
        let mut comp = Composition::new();
        let deb =
            comp.frame(|| use_debounced_state_with(|| 0i32, Duration::from_millis(200)));

        deb.set(1);
        deb.set_now(3);
        assert_eq!(deb.get(), 3);
        assert_eq!(timer::active_timers(), 0);

        clock.advance(Duration::from_millis(200));
        timer::pump();
        assert_eq!(deb.get(), 3);
    }

    // ---- force update ----

    #[test]
    fn test_force_update_requests_frame() {
        let mut comp = Composition::new();
        let force = comp.frame(use_force_update);

        while take_frame_request() {}
        force();
        assert!(take_frame_request());
        force();
        assert!(take_frame_request());
    }

    // ---- interval component ----

    #[test]
    fn test_interval_fires_every_period() {
        let clock = install_test_clock();
        let mut comp = Composition::new();
        let count = Rc::new(Cell::new(0u32));

        let c = count.clone();
        comp.frame(move || Interval(Duration::from_millis(100), move || c.set(c.get() + 1)));

        timer::pump();
        assert_eq!(count.get(), 0);

        clock.advance(Duration::from_millis(100));
        timer::pump();
        assert_eq!(count.get(), 1);

        clock.advance(Duration::from_millis(100));
        timer::pump();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_interval_does_not_restart_on_recomposition() {
        let clock = install_test_clock();
        let mut comp = Composition::new();
        let count = Rc::new(Cell::new(0u32));

        let c = count.clone();
        comp.frame(move || Interval(Duration::from_millis(100), move || c.set(c.get() + 1)));

        clock.advance(Duration::from_millis(50));
        let c = count.clone();
        comp.frame(move || Interval(Duration::from_millis(100), move || c.set(c.get() + 1)));
        assert_eq!(timer::active_timers(), 1);

        // A restart would have pushed the deadline to 150ms; the original
        // schedule fires at 100ms.
        clock.advance(Duration::from_millis(50));
        timer::pump();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_interval_restarts_on_interval_change() {
        let clock = install_test_clock();
        let mut comp = Composition::new();
        let count = Rc::new(Cell::new(0u32));

        let c = count.clone();
        comp.frame(move || Interval(Duration::from_millis(100), move || c.set(c.get() + 1)));

        clock.advance(Duration::from_millis(50));
        let c = count.clone();
        comp.frame(move || Interval(Duration::from_millis(200), move || c.set(c.get() + 1)));
        assert_eq!(timer::active_timers(), 1);

        // Old 100ms deadline is gone.
        clock.advance(Duration::from_millis(50));
        timer::pump();
        assert_eq!(count.get(), 0);

        // New timer fires 200ms after the change.
        clock.advance(Duration::from_millis(150));
        timer::pump();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_interval_stops_on_dispose() {
        let clock = install_test_clock();
        let mut comp = Composition::new();
        let count = Rc::new(Cell::new(0u32));

        let c = count.clone();
        comp.frame(move || Interval(Duration::from_millis(100), move || c.set(c.get() + 1)));

        comp.dispose();
        assert_eq!(timer::active_timers(), 0);

        clock.advance(Duration::from_millis(300));
        timer::pump();
        assert_eq!(count.get(), 0);
    }

    // ---- grid helpers ----

    #[test]
    fn test_regenerate_cell_changes_only_target() {
        let grid: Grid = vec![vec![1.0, 2.0], vec![3.0, 4.0]].into();
        let mut rng = StdRng::seed_from_u64(7);

        let next = regenerate_cell(&grid, CellRef { row: 0, column: 1 }, &mut rng);

        assert_eq!(next.get(0, 0), Some(1.0));
        assert_eq!(next.get(1, 0), Some(3.0));
        assert_eq!(next.get(1, 1), Some(4.0));
        let x = next.get(0, 1).unwrap();
        assert!((0.0..CELL_MAX).contains(&x));
    }

    #[test]
    fn test_regenerate_cell_out_of_range_is_noop() {
        let grid: Grid = vec![vec![1.0, 2.0], vec![3.0, 4.0]].into();
        let mut rng = StdRng::seed_from_u64(7);

        let next = regenerate_cell(&grid, CellRef { row: 5, column: 0 }, &mut rng);
        assert_eq!(next, grid);

        let next = regenerate_cell(&grid, CellRef { row: 0, column: 9 }, &mut rng);
        assert_eq!(next, grid);
    }

    #[test]
    fn test_regenerate_all_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let grid = Grid::random(8, 8, &mut rng);

        let next = regenerate_all(&grid, &mut rng);
        assert_eq!(next.rows(), 8);
        for row in 0..8 {
            for col in 0..8 {
                let v = next.get(row, col).unwrap();
                assert!((0.0..CELL_MAX).contains(&v));
            }
        }
    }

    #[test]
    fn test_regenerate_all_is_deterministic_under_seed() {
        let base: Grid = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]].into();

        let mut rng_a = StdRng::seed_from_u64(123);
        let mut rng_b = StdRng::seed_from_u64(123);
        assert_eq!(
            regenerate_all(&base, &mut rng_a),
            regenerate_all(&base, &mut rng_b)
        );
    }

    #[test]
    fn test_grid_random_dimensions() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = Grid::random(3, 5, &mut rng);
        assert_eq!(grid.rows(), 3);
        for row in 0..grid.rows() {
            assert_eq!(grid.columns_in(row), 5);
        }
        for row in grid.as_rows() {
            assert_eq!(row.len(), 5);
        }
        assert_eq!(grid.columns_in(3), 0);
        assert_eq!(grid.get(3, 0), None);
    }
}
