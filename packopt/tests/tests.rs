#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use boxpack::entities::{Container, Item, PackingResult};
    use boxpack::geometry::primitives::Dims;
    use boxpack::util::{CancelToken, Cancelled, assertions};
    use float_cmp::approx_eq;
    use packopt::config::PackConfig;
    use packopt::engine::{self, Mode, Outcome, PackRequest};
    use packopt::opt::Algorithm;
    use packopt::progress::Progress;
    use test_case::test_case;

    fn init_logger() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    fn cube_items(n: usize, side: f64) -> Vec<Item> {
        (0..n)
            .map(|i| Item::new(format!("cube-{i}"), "Cube", Dims::new(side, side, side)))
            .collect()
    }

    fn request(container: Dims, items: Vec<Item>, parameters: PackConfig) -> PackRequest {
        PackRequest {
            container: Container::new("container", container),
            containers: vec![],
            items,
            parameters,
            mode: Mode::Single,
            algorithms: None,
        }
    }

    fn config(algorithm: Algorithm, grid_resolution: f64) -> PackConfig {
        PackConfig {
            algorithm,
            grid_resolution,
            genetic_generations: 5,
            prng_seed: Some(0),
            ..PackConfig::default()
        }
    }

    fn run_single(request: &PackRequest) -> PackingResult {
        match engine::run(request, CancelToken::new(), Progress::silent()).unwrap() {
            Outcome::Single(result) => result,
            Outcome::Comparison(_) => panic!("expected a single result"),
        }
    }

    #[test]
    fn eight_cubes_fill_container() {
        init_logger();
        let request = request(
            Dims::new(4.0, 4.0, 4.0),
            cube_items(8, 2.0),
            config(Algorithm::FirstFitDecreasing, 2.0),
        );
        let result = run_single(&request);

        assert_eq!(result.packed_items.len(), 8);
        assert!(result.unpacked_items.is_empty());
        assert!(approx_eq!(f64, result.utilization, 100.0, ulps = 4));
        assert_eq!(result.algorithm_name.as_deref(), Some("First-Fit Decreasing"));
        assert!(assertions::result_is_valid(&result, &request.items));
    }

    #[test]
    fn tall_item_gets_rotated() {
        init_logger();
        let items = vec![Item::new("tall", "Tall", Dims::new(4.0, 9.0, 4.0))];
        let request = request(
            Dims::new(10.0, 5.0, 5.0),
            items,
            config(Algorithm::FirstFitDecreasing, 1.0),
        );
        let result = run_single(&request);

        assert!(result.unpacked_items.is_empty());
        let packed = &result.packed_items[0];
        assert!(packed.rotated);
        assert!(packed.item.dims.same_multiset(&Dims::new(4.0, 9.0, 4.0)));
        assert!(packed.item.dims.height <= 5.0);
        assert!(assertions::result_is_valid(&result, &request.items));
    }

    #[test_case(Algorithm::FirstFitDecreasing; "ffd")]
    #[test_case(Algorithm::BestFit; "best_fit")]
    #[test_case(Algorithm::Genetic; "genetic")]
    #[test_case(Algorithm::SimulatedAnnealing; "annealing")]
    fn oversized_item_stays_unpacked(algorithm: Algorithm) {
        init_logger();
        let items = vec![
            Item::new("rod", "Rod", Dims::new(6.0, 1.0, 1.0)),
            Item::new("cube", "Cube", Dims::new(1.0, 1.0, 1.0)),
        ];
        let request = request(Dims::new(5.0, 5.0, 5.0), items, config(algorithm, 1.0));
        let result = run_single(&request);

        assert_eq!(result.unpacked_items.len(), 1);
        assert_eq!(result.unpacked_items[0].id, "rod");
        assert_eq!(result.unpacked_items[0].dims, Dims::new(6.0, 1.0, 1.0));
        assert_eq!(result.packed_items.len(), 1);
        assert!(assertions::result_is_valid(&result, &request.items));
    }

    #[test]
    fn overflow_goes_to_second_container() {
        init_logger();
        let parameters = PackConfig {
            container_count: 2,
            ..config(Algorithm::FirstFitDecreasing, 2.0)
        };
        let request = request(Dims::new(4.0, 4.0, 4.0), cube_items(12, 2.0), parameters);
        let result = run_single(&request);

        let containers = result.containers.as_ref().unwrap();
        assert_eq!(containers.len(), 2);
        assert_eq!(containers[0].id, "container-1");
        assert_eq!(containers[1].id, "container-2");
        assert_eq!(containers[0].packed_items.len(), 8);
        assert_eq!(containers[1].packed_items.len(), 4);
        assert!(result.unpacked_items.is_empty());
        assert_eq!(result.is_multi_container, Some(true));
        // 12 * 8 out of 2 * 64
        assert!(approx_eq!(f64, result.total_utilization.unwrap(), 75.0, ulps = 4));
        // the first container is mirrored at the top level
        assert_eq!(result.packed_items, containers[0].packed_items);
        assert!(approx_eq!(f64, result.utilization, 100.0, ulps = 4));
        assert!(assertions::result_is_valid(&result, &request.items));
    }

    #[test]
    fn unused_containers_are_skipped() {
        init_logger();
        let parameters = PackConfig {
            container_count: 3,
            ..config(Algorithm::FirstFitDecreasing, 2.0)
        };
        let request = request(Dims::new(4.0, 4.0, 4.0), cube_items(2, 2.0), parameters);
        let result = run_single(&request);

        assert_eq!(result.containers.as_ref().unwrap().len(), 1);
        // 16 out of 64, unused containers do not count
        assert!(approx_eq!(f64, result.total_utilization.unwrap(), 25.0, ulps = 4));
        assert_eq!(result.is_multi_container, Some(true));
    }

    #[test]
    fn zero_containers_pack_nothing() {
        init_logger();
        let parameters = PackConfig {
            container_count: 0,
            ..config(Algorithm::FirstFitDecreasing, 2.0)
        };
        let request = request(Dims::new(4.0, 4.0, 4.0), cube_items(3, 2.0), parameters);
        let result = run_single(&request);

        assert!(result.packed_items.is_empty());
        assert_eq!(result.unpacked_items, request.items);
        assert_eq!(result.containers.as_ref().map(|c| c.len()), Some(0));
        assert_eq!(result.total_utilization, Some(0.0));
        assert!(assertions::result_is_valid(&result, &request.items));
    }

    #[test]
    fn explicit_containers_in_order() {
        init_logger();
        let mut request = request(
            Dims::new(1.0, 1.0, 1.0),
            vec![
                Item::new("large", "Large", Dims::new(4.0, 4.0, 4.0)),
                Item::new("small", "Small", Dims::new(2.0, 2.0, 2.0)),
            ],
            config(Algorithm::FirstFitDecreasing, 1.0),
        );
        request.containers = vec![
            Container::new("crate", Dims::new(2.0, 2.0, 2.0)),
            Container::new("pallet", Dims::new(4.0, 4.0, 4.0)),
        ];
        let result = run_single(&request);

        let containers = result.containers.as_ref().unwrap();
        assert_eq!(containers[0].id, "crate");
        assert_eq!(containers[0].packed_items[0].id(), "small");
        assert_eq!(containers[1].id, "pallet");
        assert_eq!(containers[1].packed_items[0].id(), "large");
        assert_eq!(result.container.id, "crate");
        assert!(result.unpacked_items.is_empty());
        assert!(assertions::result_is_valid(&result, &request.items));
    }

    #[test]
    fn ffd_is_deterministic() {
        init_logger();
        let items = (0..10)
            .map(|i| {
                let dims = Dims::new(1.0 + (i % 3) as f64, 2.0, 1.0 + (i % 4) as f64);
                Item::new(format!("item-{i}"), "Item", dims)
            })
            .collect();
        let mut parameters = config(Algorithm::FirstFitDecreasing, 1.0);
        parameters.prng_seed = None;
        let request = request(Dims::new(6.0, 4.0, 5.0), items, parameters);

        let first = serde_json::to_string(&run_single(&request)).unwrap();
        let second = serde_json::to_string(&run_single(&request)).unwrap();
        assert_eq!(first, second);
    }

    #[test_case(Algorithm::Genetic; "genetic")]
    #[test_case(Algorithm::SimulatedAnnealing; "annealing")]
    fn seeded_metaheuristics_are_reproducible(algorithm: Algorithm) {
        init_logger();
        let items = (0..8)
            .map(|i| {
                let dims = Dims::new(1.0 + (i % 3) as f64, 1.0 + (i % 2) as f64, 2.0);
                Item::new(format!("item-{i}"), "Item", dims)
            })
            .collect();
        let parameters = PackConfig {
            prng_seed: Some(1234),
            ..config(algorithm, 1.0)
        };
        let request = request(Dims::new(4.0, 3.0, 4.0), items, parameters);

        let first = run_single(&request);
        let second = run_single(&request);
        assert_eq!(first, second);
        assert!(assertions::result_is_valid(&first, &request.items));
    }

    #[test_case(vec![Algorithm::Genetic]; "alone")]
    #[test_case(vec![Algorithm::SimulatedAnnealing, Algorithm::Genetic]; "after_annealing")]
    #[test_case(vec![Algorithm::Genetic, Algorithm::SimulatedAnnealing]; "before_annealing")]
    fn compared_genetic_matches_single_run(algorithms: Vec<Algorithm>) {
        init_logger();
        let items = (0..9)
            .map(|i| {
                let dims = Dims::new(
                    1.0 + (i % 3) as f64,
                    1.0 + (i % 2) as f64,
                    1.0 + (i % 4) as f64,
                );
                Item::new(format!("i{i}"), "Item", dims)
            })
            .collect();
        let parameters = PackConfig {
            genetic_generations: 3,
            prng_seed: Some(7),
            ..config(Algorithm::Genetic, 1.0)
        };
        let mut request = request(Dims::new(5.0, 4.0, 5.0), items, parameters);
        let single = run_single(&request);

        request.mode = Mode::Compare;
        request.algorithms = Some(algorithms);
        let Ok(Outcome::Comparison(comparison)) =
            engine::run(&request, CancelToken::new(), Progress::silent())
        else {
            panic!("expected a comparison");
        };
        let compared = comparison
            .results
            .iter()
            .find(|r| r.algorithm_name.as_deref() == Some("Genetic Algorithm"))
            .unwrap();
        assert_eq!(compared, &single);
    }

    #[test]
    fn comparison_is_ranked() {
        init_logger();
        let items = vec![
            Item::new("tall-1", "Tall", Dims::new(2.0, 4.0, 2.0)),
            Item::new("tall-2", "Tall", Dims::new(2.0, 4.0, 2.0)),
            Item::new("flat", "Flat", Dims::new(4.0, 1.0, 2.0)),
        ];
        let mut request = request(
            Dims::new(4.0, 2.0, 4.0),
            items,
            config(Algorithm::FirstFitDecreasing, 1.0),
        );
        request.mode = Mode::Compare;

        let comparison = match engine::run(&request, CancelToken::new(), Progress::silent()) {
            Ok(Outcome::Comparison(comparison)) => comparison,
            other => panic!("expected a comparison, got {other:?}"),
        };

        assert_eq!(comparison.results.len(), 4);
        assert_eq!(
            comparison.results[0].algorithm_name.as_deref(),
            Some(comparison.best_algorithm.as_str())
        );
        assert!(
            comparison
                .results
                .windows(2)
                .all(|w| w[0].effective_utilization() >= w[1].effective_utilization())
        );
        // best-fit cannot lay the tall items down, the others can
        let best_fit = comparison
            .results
            .iter()
            .find(|r| r.algorithm_name.as_deref() == Some("Best-Fit"))
            .unwrap();
        assert!(best_fit.utilization < comparison.results[0].utilization);
    }

    #[test]
    fn comparison_of_subset() {
        init_logger();
        let mut request = request(
            Dims::new(4.0, 4.0, 4.0),
            cube_items(4, 2.0),
            config(Algorithm::FirstFitDecreasing, 2.0),
        );
        request.mode = Mode::Compare;
        request.algorithms = Some(vec![Algorithm::BestFit, Algorithm::FirstFitDecreasing]);

        let Ok(Outcome::Comparison(comparison)) =
            engine::run(&request, CancelToken::new(), Progress::silent())
        else {
            panic!("expected a comparison");
        };
        let names: Vec<_> = comparison
            .results
            .iter()
            .map(|r| r.algorithm_name.clone().unwrap())
            .collect();
        // equal utilization keeps the requested order
        assert_eq!(names, vec!["Best-Fit", "First-Fit Decreasing"]);
        assert_eq!(comparison.best_algorithm, "Best-Fit");
    }

    #[test]
    fn empty_comparison_fails() {
        let mut request = request(
            Dims::new(4.0, 4.0, 4.0),
            cube_items(1, 2.0),
            config(Algorithm::FirstFitDecreasing, 2.0),
        );
        request.mode = Mode::Compare;
        request.algorithms = Some(vec![]);
        assert!(engine::run(&request, CancelToken::new(), Progress::silent()).is_err());
    }

    #[test]
    fn progress_is_monotonic_and_completes() {
        init_logger();
        let seen = Arc::new(Mutex::new(vec![]));
        let sink = seen.clone();
        let mut request = request(
            Dims::new(4.0, 4.0, 4.0),
            cube_items(10, 2.0),
            PackConfig {
                container_count: 2,
                ..config(Algorithm::FirstFitDecreasing, 2.0)
            },
        );
        request.mode = Mode::Compare;

        engine::run(
            &request,
            CancelToken::new(),
            Progress::new(move |p| sink.lock().unwrap().push(p)),
        )
        .unwrap();

        let seen = seen.lock().unwrap();
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(seen.first(), Some(&0));
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.len() > 4);
    }

    #[test_case(Algorithm::FirstFitDecreasing; "ffd")]
    #[test_case(Algorithm::BestFit; "best_fit")]
    #[test_case(Algorithm::Genetic; "genetic")]
    #[test_case(Algorithm::SimulatedAnnealing; "annealing")]
    fn cancelled_before_start(algorithm: Algorithm) {
        init_logger();
        let request = request(Dims::new(4.0, 4.0, 4.0), cube_items(3, 2.0), config(algorithm, 1.0));
        let cancel = CancelToken::new();
        cancel.cancel();

        let err = engine::run(&request, cancel, Progress::silent()).unwrap_err();
        assert_eq!(err.downcast_ref::<Cancelled>(), Some(&Cancelled));
    }

    #[test]
    fn cancelled_from_another_thread() {
        init_logger();
        let parameters = PackConfig {
            genetic_generations: 10_000,
            ..config(Algorithm::Genetic, 0.5)
        };
        let request = request(Dims::new(20.0, 20.0, 20.0), cube_items(30, 3.0), parameters);
        let cancel = CancelToken::new();
        let trigger = cancel.clone();

        let handle = std::thread::spawn(move || engine::run(&request, cancel, Progress::silent()));
        std::thread::sleep(std::time::Duration::from_millis(50));
        trigger.cancel();

        let err = handle.join().unwrap().unwrap_err();
        assert!(err.downcast_ref::<Cancelled>().is_some());
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let request = request(
            Dims::new(4.0, 4.0, 4.0),
            cube_items(1, 2.0),
            config(Algorithm::FirstFitDecreasing, -1.0),
        );
        assert!(engine::run(&request, CancelToken::new(), Progress::silent()).is_err());
    }

    #[test]
    fn stats_include_weights() {
        let items = vec![
            Item::new("a", "A", Dims::new(2.0, 2.0, 2.0)).with_weight(3.0),
            Item::new("b", "B", Dims::new(2.0, 2.0, 2.0)),
            Item::new("c", "C", Dims::new(5.0, 5.0, 5.0)).with_weight(10.0),
        ];
        let request = request(
            Dims::new(4.0, 4.0, 4.0),
            items,
            config(Algorithm::FirstFitDecreasing, 2.0),
        );
        let stats = run_single(&request).stats();

        assert_eq!(stats.packed_count, 2);
        assert_eq!(stats.unpacked_count, 1);
        assert_eq!(stats.packed_weight, 3.0);
        assert_eq!(stats.total_weight, 13.0);
        assert!(stats.has_weight_data);
    }
}
