//! Разбиение датасета: стратифицированный train/test и k-fold

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::types::LabeledRecord;

/// Стратифицированное разбиение по виду пингвина. Детерминировано при
/// фиксированном seed: одинаковый вход всегда дает одинаковое членство.
/// Порядок записей внутри каждой части совпадает с порядком входа.
pub fn stratified_split(
    records: &[LabeledRecord],
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<LabeledRecord>, Vec<LabeledRecord>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(Error::Numeric(format!(
            "test fraction {test_fraction} outside (0, 1)"
        )));
    }

    // BTreeMap фиксирует порядок обхода страт, что делает выборку
    // воспроизводимой при одном seed
    let mut strata: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, rec) in records.iter().enumerate() {
        let key = rec.features.species.clone().unwrap_or_default();
        strata.entry(key).or_default().push(idx);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut in_test = vec![false; records.len()];

    for (key, indices) in &strata {
        if indices.len() < 2 {
            return Err(Error::InsufficientData(format!(
                "stratum '{key}' has {} record(s), need at least 2 to split",
                indices.len()
            )));
        }

        let mut shuffled = indices.clone();
        shuffled.shuffle(&mut rng);

        // доля страты в test с точностью до округления, но хотя бы по
        // одной записи на каждую сторону
        let want = (indices.len() as f64 * test_fraction).round() as usize;
        let take = want.clamp(1, indices.len() - 1);
        for &idx in shuffled.iter().take(take) {
            in_test[idx] = true;
        }
    }

    let mut train = Vec::new();
    let mut test = Vec::new();
    for (idx, rec) in records.iter().enumerate() {
        if in_test[idx] {
            test.push(rec.clone());
        } else {
            train.push(rec.clone());
        }
    }
    Ok((train, test))
}

/// Детерминированное назначение записей по k фолдам для кросс-валидации.
/// Возвращает индексы записей каждого фолда.
pub fn k_folds(n: usize, k: usize, seed: u64) -> Result<Vec<Vec<usize>>> {
    if k < 2 || k > n {
        return Err(Error::InsufficientData(format!(
            "cannot make {k} folds out of {n} record(s)"
        )));
    }

    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let mut folds = vec![Vec::new(); k];
    for (pos, idx) in order.into_iter().enumerate() {
        folds[pos % k].push(idx);
    }
    Ok(folds)
}
