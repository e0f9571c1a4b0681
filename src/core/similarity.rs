//! Fuzzy brand-domain similarity.
//!
//! The ratio is `2*M / T`, where `M` is the total size of the matching blocks
//! found by recursively taking the longest common substring (leftmost on ties)
//! and recursing on both sides of it, and `T` is the combined length.

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatch {
    pub ratio: f64,
    pub matched_brand_domain: String,
}

/// Best match for `domain` among `brand_domains`; the first candidate wins ties.
pub fn best_brand_match<'a, I>(domain: &str, brand_domains: I) -> Option<SimilarityMatch>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<SimilarityMatch> = None;
    for candidate in brand_domains {
        let ratio = sequence_ratio(domain, candidate);
        if best.as_ref().map_or(true, |b| ratio > b.ratio) {
            best = Some(SimilarityMatch {
                ratio,
                matched_brand_domain: candidate.to_string(),
            });
        }
    }
    best
}

pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_size(&a, &b);
    2.0 * matched as f64 / total as f64
}

fn matching_size(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    // curr[col]: length of the common run ending at a[i], b[col - 1 + blo]
    let width = bhi - blo;
    let mut prev = vec![0usize; width + 1];
    let mut curr = vec![0usize; width + 1];
    for i in alo..ahi {
        for j in blo..bhi {
            let col = j - blo + 1;
            curr[col] = if a[i] == b[j] { prev[col - 1] + 1 } else { 0 };
            let k = curr[col];
            if k > best_k {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_k = k;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    (best_i, best_j, best_k)
}
