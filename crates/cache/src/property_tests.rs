//! Property tests for tag invalidation.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::convert::Infallible;

use crate::TagAwareCache;

const TAGS: &[&str] = &["authorsCache", "booksCache", "statsCache"];

#[derive(Debug, Clone)]
enum CacheOp {
    Get { key: String, tag: usize },
    Invalidate { tag: usize },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        ("[a-d]-[1-3]", 0..TAGS.len()).prop_map(|(key, tag)| CacheOp::Get { key, tag }),
        (0..TAGS.len()).prop_map(|tag| CacheOp::Invalidate { tag }),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("test runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // After any sequence of lookups and invalidations, a key is cached exactly
    // when a model that replays the same operations says it should be.
    #[test]
    fn prop_cache_matches_tag_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let rt = runtime();
        let cache: TagAwareCache<String> = TagAwareCache::new();
        let mut model: HashMap<String, HashSet<usize>> = HashMap::new();
        let mut expected_misses = 0u64;

        rt.block_on(async {
            for op in &ops {
                match op {
                    CacheOp::Get { key, tag } => {
                        if !model.contains_key(key) {
                            expected_misses += 1;
                            model.insert(key.clone(), HashSet::from([*tag]));
                        }
                        let _: Result<String, Infallible> =
                            cache.get(key, &[TAGS[*tag]], || Ok(key.clone())).await;
                    }
                    CacheOp::Invalidate { tag } => {
                        model.retain(|_, tags| !tags.contains(tag));
                        cache.invalidate_tags(&[TAGS[*tag]]).await;
                    }
                }
            }
        });

        rt.block_on(async {
            for key in model.keys() {
                prop_assert!(cache.contains(key).await);
            }
            prop_assert_eq!(cache.len().await, model.len());
            prop_assert_eq!(cache.stats().await.misses, expected_misses);
            Ok(())
        })?;
    }

    // A cached value is always the one the first producer returned.
    #[test]
    fn prop_hit_returns_first_value(key in "[a-z]{1,8}", first in any::<u32>(), second in any::<u32>()) {
        let rt = runtime();
        let cache: TagAwareCache<u32> = TagAwareCache::new();

        let (a, b) = rt.block_on(async {
            let a: Result<u32, Infallible> = cache.get(&key, &["t"], || Ok(first)).await;
            let b: Result<u32, Infallible> = cache.get(&key, &["t"], || Ok(second)).await;
            (a, b)
        });

        prop_assert_eq!(a, Ok(first));
        prop_assert_eq!(b, Ok(first));
    }
}
