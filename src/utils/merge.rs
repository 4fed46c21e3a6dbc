// src/utils/merge.rs

use serde_json::{Map, Value};

/// Recursively merges `src` into `dst`.
///
/// Objects are merged key by key and arrays element by element; any other
/// value in `src` replaces the one in `dst`.
pub fn deep_merge(dst: &mut Value, src: Value) {
    match (dst, src) {
        (Value::Object(d), Value::Object(s)) => {
            for (k, v) in s {
                match d.get_mut(&k) {
                    Some(existing) => deep_merge(existing, v),
                    None => {
                        d.insert(k, v);
                    }
                }
            }
        }
        (Value::Array(d), Value::Array(s)) => {
            for (i, v) in s.into_iter().enumerate() {
                if i < d.len() {
                    deep_merge(&mut d[i], v);
                } else {
                    d.push(v);
                }
            }
        }
        (d, s) => *d = s,
    }
}

/// Takes the keys of `a`, with values from `b` wherever `b` has them.
/// Keys only present in `b` are dropped.
pub fn merge_only(a: &Map<String, Value>, b: &Map<String, Value>) -> Map<String, Value> {
    a.iter()
        .map(|(k, v)| (k.clone(), b.get(k).unwrap_or(v).clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_objects_are_merged() {
        let mut a = json!({"ms": {"iso": [1.0, 2.0]}, "n": 1});
        deep_merge(&mut a, json!({"ms": {"aniso": [3.0]}, "efg": {"vzz": [0.5]}}));
        assert_eq!(
            a,
            json!({"ms": {"iso": [1.0, 2.0], "aniso": [3.0]}, "n": 1, "efg": {"vzz": [0.5]}})
        );
    }

    #[test]
    fn arrays_merge_by_index() {
        let mut a = json!([{"x": 1}, 2]);
        deep_merge(&mut a, json!([{"y": 2}, 3, 4]));
        assert_eq!(a, json!([{"x": 1, "y": 2}, 3, 4]));
    }

    #[test]
    fn scalars_and_null_overwrite() {
        let mut a = json!({"a": 1, "b": {"c": 2}});
        deep_merge(&mut a, json!({"a": "one", "b": null}));
        assert_eq!(a, json!({"a": "one", "b": null}));
    }

    #[test]
    fn merge_only_keeps_known_keys() {
        let a = json!({"x": 1, "y": 2});
        let b = json!({"y": 5, "z": 9});
        let c = merge_only(a.as_object().unwrap(), b.as_object().unwrap());
        assert_eq!(Value::Object(c), json!({"x": 1, "y": 5}));
    }
}
