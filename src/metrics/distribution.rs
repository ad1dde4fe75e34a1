use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionBucket {
    pub label: String,
    pub count: u32,
    pub percentage: f64,
}

/// Most frequent first; ties keep first-encountered order.
pub fn distribution<I, S>(labels: I) -> Vec<DistributionBucket>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut buckets: Vec<DistributionBucket> = Vec::new();
    let mut total = 0u32;

    for label in labels {
        let label = label.as_ref();
        total += 1;
        match buckets.iter_mut().find(|bucket| bucket.label == label) {
            Some(bucket) => bucket.count += 1,
            None => buckets.push(DistributionBucket {
                label: label.to_string(),
                count: 1,
                percentage: 0.0,
            }),
        }
    }

    if total == 0 {
        return buckets;
    }

    for bucket in &mut buckets {
        bucket.percentage = bucket.count as f64 / total as f64 * 100.0;
    }
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets
}

pub fn top(mut buckets: Vec<DistributionBucket>, n: usize) -> Vec<DistributionBucket> {
    buckets.truncate(n);
    buckets
}
