use super::types::{DateGroup, Page, Picture};

/// Groups consecutive pictures of the same date, preserving order.
/// Dates without pictures produce no group.
pub fn group_pictures_by_date(pictures: &[Picture]) -> Vec<DateGroup> {
    let mut groups: Vec<DateGroup> = Vec::new();

    for picture in pictures {
        match groups.last_mut() {
            Some(group) if group.date == picture.date => group.pictures.push(picture.clone()),
            _ => groups.push(DateGroup {
                date: picture.date.clone(),
                pictures: vec![picture.clone()],
            }),
        }
    }

    groups
}

/// Packs whole date groups into pages.
///
/// Groups are added to the current page until its picture count reaches
/// `threshold`; the group that reaches it stays on that page, so pages may
/// run over but a group is never split. A threshold of zero gives every
/// group its own page.
pub fn paginate_groups(groups: &[DateGroup], threshold: usize) -> Vec<Page> {
    let threshold = threshold.max(1);
    let mut pages = Vec::new();
    let mut current = Vec::new();
    let mut count = 0;

    for group in groups {
        count += group.len();
        current.push(group.clone());

        if count >= threshold {
            pages.push(Page {
                groups: std::mem::take(&mut current),
            });
            count = 0;
        }
    }

    if !current.is_empty() {
        pages.push(Page { groups: current });
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pictures(layout: &[(&str, usize)]) -> Vec<Picture> {
        let mut pictures = Vec::new();
        for (date, count) in layout {
            for i in (0..*count).rev() {
                let position = pictures.len();
                pictures.push(Picture {
                    date: date.to_string(),
                    filename: format!("{:03}.jpg", i),
                    position,
                });
            }
        }
        pictures
    }

    fn page_sizes(pages: &[Page]) -> Vec<Vec<usize>> {
        pages
            .iter()
            .map(|p| p.groups.iter().map(DateGroup::len).collect())
            .collect()
    }

    #[test]
    fn test_grouping_preserves_order() {
        let groups = group_pictures_by_date(&pictures(&[("20230102", 1), ("20230101", 2)]));

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, "20230102");
        assert_eq!(groups[1].date, "20230101");
        assert_eq!(groups[1].pictures[0].filename, "001.jpg");
        assert_eq!(groups[1].pictures[1].filename, "000.jpg");
    }

    #[test]
    fn test_grouping_empty() {
        assert!(group_pictures_by_date(&[]).is_empty());
        assert!(paginate_groups(&[], 10).is_empty());
    }

    #[test]
    fn test_group_crossing_threshold_stays_on_page() {
        let groups = group_pictures_by_date(&pictures(&[("20230102", 1), ("20230101", 2)]));
        let pages = paginate_groups(&groups, 2);

        assert_eq!(page_sizes(&pages), vec![vec![1, 2]]);
        assert_eq!(pages[0].picture_count(), 3);
    }

    #[test]
    fn test_oversized_group_gets_own_page() {
        let groups = group_pictures_by_date(&pictures(&[
            ("20230105", 2),
            ("20230104", 10),
            ("20230103", 1),
            ("20230102", 1),
        ]));
        let pages = paginate_groups(&groups, 4);

        assert_eq!(page_sizes(&pages), vec![vec![2, 10], vec![1, 1]]);

        let groups = group_pictures_by_date(&pictures(&[("20230104", 10), ("20230103", 1)]));
        let pages = paginate_groups(&groups, 4);
        assert_eq!(page_sizes(&pages), vec![vec![10], vec![1]]);
    }

    #[test]
    fn test_zero_threshold_puts_each_group_on_own_page() {
        let groups = group_pictures_by_date(&pictures(&[
            ("20230103", 3),
            ("20230102", 1),
            ("20230101", 2),
        ]));
        let pages = paginate_groups(&groups, 0);

        assert_eq!(page_sizes(&pages), vec![vec![3], vec![1], vec![2]]);
    }

    #[test]
    fn test_pages_reach_threshold_except_last() {
        let layout = [
            ("20230110", 3),
            ("20230109", 1),
            ("20230108", 4),
            ("20230107", 2),
            ("20230106", 2),
            ("20230105", 7),
            ("20230104", 1),
            ("20230103", 1),
        ];
        let groups = group_pictures_by_date(&pictures(&layout));

        for threshold in 1..=8 {
            let pages = paginate_groups(&groups, threshold);

            for page in &pages[..pages.len() - 1] {
                assert!(page.picture_count() >= threshold);
                // Without its last group, the page was still below the threshold.
                let last = page.groups.last().unwrap().len();
                assert!(page.picture_count() - last < threshold);
            }

            let flattened: Vec<_> = pages.iter().flat_map(|p| p.groups.clone()).collect();
            assert_eq!(flattened, groups);
        }
    }
}
