use mockwork_core::prelude::*;
use mockwork_test_utils::isolated_builder;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_counters_partition_calls(arg_counts in proptest::collection::vec(0..4usize, 0..64)) {
        let mock = isolated_builder("Prop::Counters").method("m", 0).build().unwrap();

        for count in &arg_counts {
            let args: Vec<Value> = (0..*count).map(|i| Value::Int(i as i64)).collect();
            mock.call("m", &args).unwrap();

            let stats = mock.call_stats("m").unwrap();
            prop_assert_eq!(stats.times_called, stats.times_with_args + stats.times_without_args);
        }

        let stats = mock.call_stats("m").unwrap();
        let with_args = arg_counts.iter().filter(|c| **c > 0).count() as u64;
        prop_assert_eq!(stats.times_called, arg_counts.len() as u64);
        prop_assert_eq!(stats.times_with_args, with_args);
    }

    #[test]
    fn prop_read_only_never_changes(writes in proptest::collection::vec(any::<i64>(), 1..16)) {
        let mock = isolated_builder("Prop::ReadOnly")
            .method("fixed", make_read_only(7))
            .build()
            .unwrap();

        for w in writes {
            let is_immutable = matches!(
                mock.call("fixed", &[Value::Int(w)]),
                Err(MockError::ImmutableMethod { .. })
            );
            prop_assert!(is_immutable);
            prop_assert_eq!(mock.get("fixed").unwrap(), Value::Int(7));
        }
    }

    #[test]
    fn prop_stored_value_reads_last_write(
        writes in proptest::collection::vec(any::<i64>(), 1..16)
    ) {
        let mock = isolated_builder("Prop::Stored")
            .method("v", Value::Undef)
            .build()
            .unwrap();

        for w in &writes {
            mock.call("v", &[Value::Int(*w)]).unwrap();
        }
        prop_assert_eq!(mock.get("v").unwrap(), Value::Int(*writes.last().unwrap()));
    }

    #[test]
    fn prop_shared_prefix_chains_compose(
        leaves in proptest::collection::hash_set("[a-z]{1,8}", 1..8)
    ) {
        let builder = leaves.iter().fold(isolated_builder("Prop::Chains"), |builder, leaf| {
            builder.chain(["root".to_string(), leaf.clone()], leaf.clone())
        });
        let mock = builder.build().unwrap();

        for leaf in &leaves {
            prop_assert_eq!(
                mock.call_chain(&["root", leaf.as_str()]).unwrap(),
                Value::from(leaf.clone())
            );
        }
    }
}
