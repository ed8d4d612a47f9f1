use serde::Serialize;

use crate::normalizer::Order;

/// Number of equal-width bins in the amount histogram.
pub const HISTOGRAM_BINS: usize = 30;

/// Half-open price range `[lower, upper)`; the last one has no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBucket {
    pub label: &'static str,
    pub lower: f64,
    pub upper: Option<f64>,
}

impl PriceBucket {
    pub fn contains(&self, amount: f64) -> bool {
        amount >= self.lower && self.upper.map_or(true, |upper| amount < upper)
    }
}

pub const PRICE_BUCKETS: [PriceBucket; 6] = [
    PriceBucket { label: "0-10", lower: 0.0, upper: Some(10.0) },
    PriceBucket { label: "11-20", lower: 10.0, upper: Some(20.0) },
    PriceBucket { label: "21-30", lower: 20.0, upper: Some(30.0) },
    PriceBucket { label: "31-40", lower: 30.0, upper: Some(40.0) },
    PriceBucket { label: "41-50", lower: 40.0, upper: Some(50.0) },
    PriceBucket { label: ">50", lower: 50.0, upper: None },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBucketCount {
    #[serde(flatten)]
    pub bucket: PriceBucket,
    pub count: usize,
}

/// Counts orders per price bucket. All six buckets are always returned, in
/// ascending order; orders with a null or negative amount are not counted.
pub fn price_distribution(orders: &[&Order]) -> Vec<PriceBucketCount> {
    PRICE_BUCKETS
        .iter()
        .map(|bucket| PriceBucketCount {
            bucket: *bucket,
            count: orders
                .iter()
                .filter_map(|o| o.amount)
                .filter(|a| bucket.contains(*a))
                .count(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width histogram over the non-null amounts. The maximum lands in
/// the last bin. A single distinct value yields one zero-width bin.
pub fn amount_histogram(orders: &[&Order], bins: usize) -> Vec<HistogramBin> {
    let amounts: Vec<f64> = orders.iter().filter_map(|o| o.amount).collect();
    if amounts.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = amounts.iter().copied().fold(f64::INFINITY, f64::min);
    let max = amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == min {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: amounts.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for amount in amounts {
        let idx = (((amount - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count,
        })
        .collect()
}
