use chrono::NaiveDate;

use super::types::DateNode;

/// Links newest-first date keys into a chain. Keys must already be sorted
/// newest first and parsed; the chain follows the input order.
pub fn build_date_graph(dates: &[(String, NaiveDate)]) -> Vec<DateNode> {
    dates
        .iter()
        .enumerate()
        .map(|(i, (key, date))| DateNode {
            key: key.clone(),
            date: *date,
            previous: i.checked_sub(1).map(|p| dates[p].0.clone()),
            next: dates.get(i + 1).map(|(next, _)| next.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photos::types::parse_date_key;

    fn dated(keys: &[&str]) -> Vec<(String, NaiveDate)> {
        keys.iter()
            .map(|k| (k.to_string(), parse_date_key(k).unwrap()))
            .collect()
    }

    #[test]
    fn test_empty_graph() {
        assert!(build_date_graph(&[]).is_empty());
    }

    #[test]
    fn test_single_date_has_no_neighbors() {
        let graph = build_date_graph(&dated(&["20230101"]));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph[0].previous, None);
        assert_eq!(graph[0].next, None);
    }

    #[test]
    fn test_neighbors_are_consistent() {
        let graph = build_date_graph(&dated(&["20230310", "20230102", "20221231"]));

        assert_eq!(graph[0].previous, None);
        assert_eq!(graph[0].next.as_deref(), Some("20230102"));
        assert_eq!(graph[1].previous.as_deref(), Some("20230310"));
        assert_eq!(graph[1].next.as_deref(), Some("20221231"));
        assert_eq!(graph[2].previous.as_deref(), Some("20230102"));
        assert_eq!(graph[2].next, None);

        for node in &graph {
            if let Some(next) = &node.next {
                let next_node = graph.iter().find(|n| &n.key == next).unwrap();
                assert_eq!(next_node.previous.as_ref(), Some(&node.key));
                assert!(next_node.date < node.date);
            }
        }
    }
}
