use std::collections::HashMap;

use crate::models::{Bucket, BucketKind, Execution, Report, Row};
use crate::rules::{BucketDef, ReportDef};

/// Evaluate one report definition against the classified row-set.
///
/// Leaves are pure filter-then-sum over the rows in their original order;
/// roll-ups sum their constituents in declaration order. Definitions are
/// ordered so every roll-up input already exists when it is computed,
/// which keeps the summation order canonical and re-runs bit-identical.
pub fn evaluate(rows: &[Row], def: &ReportDef) -> Report {
    let mut computed: HashMap<&'static str, Execution> = HashMap::new();
    let mut buckets = Vec::with_capacity(def.buckets.len());

    for bucket_def in &def.buckets {
        let bucket = match bucket_def {
            BucketDef::Leaf(rule) => {
                let mut totals = Execution::default();
                let mut matched = 0usize;
                for row in rows {
                    if rule.matches(row) {
                        totals.accumulate(&row.exec);
                        matched += 1;
                    }
                }
                Bucket {
                    name: rule.name,
                    kind: BucketKind::Leaf,
                    totals,
                    matched,
                }
            }
            BucketDef::Rollup(r) => {
                let mut totals = Execution::default();
                for part in r.parts {
                    // Definitions are validated to reference earlier
                    // buckets only; an unknown part contributes nothing.
                    if let Some(t) = computed.get(part) {
                        totals.accumulate(t);
                    }
                }
                Bucket {
                    name: r.name,
                    kind: BucketKind::Rollup,
                    totals,
                    matched: 0,
                }
            }
        };
        computed.insert(bucket.name, bucket.totals);
        buckets.push(bucket);
    }

    Report {
        title: def.title.clone(),
        buckets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use crate::models::RawRow;
    use crate::rules::{funding_summary, own_resources, Band, BucketDef, SOURCE_OWN, SOURCE_SGP_CSF, SOURCE_SGP_SSF};

    fn row(code: &str, concept: &str, source: &str, available: f64, disbursed: f64) -> RawRow {
        RawRow {
            code: code.to_string(),
            concept: concept.to_string(),
            source: source.to_string(),
            exec: Execution {
                available,
                committed: 0.0,
                disbursed,
                appropriation_balance: 0.0,
                unexecuted: 0.0,
            },
        }
    }

    fn sample_rows() -> Vec<Row> {
        classify(vec![
            // Own-resources judgment row before any qualifying code, so
            // its range key stays undefined
            row("", "O2380501002 Multas judiciales", SOURCE_OWN, 7.0, 1.0),
            // Two CSF teacher-payroll rows under range 01 and 64
            row("  O23101010010101", "O231010100101 Sueldo básico", SOURCE_SGP_CSF, 100.0, 10.0),
            row("  O23101010010164", "O231010100101 Sueldo básico", SOURCE_SGP_CSF, 200.0, 20.0),
            // Range 65 is administrative, not CSF
            row(
                "  O23101010010165",
                "O231010100101 Sueldo básico",
                SOURCE_SGP_CSF,
                1000.0,
                0.0,
            ),
            // SSF employee
            row("  O23101010010102", "O231010100101 Sueldo básico", SOURCE_SGP_SSF, 50.0, 5.0),
        ])
    }

    #[test]
    fn test_leaf_sum_over_matching_rows() {
        let report = evaluate(&sample_rows(), &funding_summary());
        let csf = report.get("SGP CSF (Salarios + Parafiscales)").unwrap();
        assert_eq!(csf.totals.available, 300.0);
        assert_eq!(csf.totals.disbursed, 30.0);
        assert_eq!(csf.matched, 2);
    }

    #[test]
    fn test_range_cutoff_at_65() {
        let report = evaluate(&sample_rows(), &funding_summary());
        // The range-65 row lands in the administrative bucket, not CSF.
        let admin = report.get("Administrativos SGP").unwrap();
        assert_eq!(admin.totals.available, 1000.0);
        let csf = report.get("SGP CSF (Salarios + Parafiscales)").unwrap();
        assert_eq!(csf.totals.available, 300.0);
    }

    #[test]
    fn test_unconstrained_bucket_accepts_missing_range_key() {
        let report = evaluate(&sample_rows(), &funding_summary());
        let sentencias = report.get("SENTENCIAS").unwrap();
        assert_eq!(sentencias.totals.available, 7.0);
        assert_eq!(sentencias.matched, 1);
    }

    #[test]
    fn test_rollups_equal_field_wise_sum_of_parts() {
        let rows = sample_rows();
        let def = funding_summary();
        let report = evaluate(&rows, &def);
        for bucket_def in &def.buckets {
            if let BucketDef::Rollup(r) = bucket_def {
                let total = report.get(r.name).unwrap().totals;
                let mut expected = Execution::default();
                for &part in r.parts {
                    expected.accumulate(&report.get(part).unwrap().totals);
                }
                assert_eq!(total, expected, "roll-up {} differs", r.name);
            }
        }
    }

    #[test]
    fn test_leaf_buckets_are_mutually_exclusive() {
        let rows = sample_rows();
        let def = funding_summary();
        for row in &rows {
            let hits: Vec<&str> = def
                .buckets
                .iter()
                .filter_map(|b| match b {
                    BucketDef::Leaf(rule) if rule.matches(row) => Some(rule.name),
                    _ => None,
                })
                .collect();
            assert!(
                hits.len() <= 1,
                "row with concept '{}' hit {:?}",
                row.concept,
                hits
            );
        }
    }

    #[test]
    fn test_rerun_is_bit_identical() {
        let rows = sample_rows();
        let def = funding_summary();
        let a = evaluate(&rows, &def);
        let b = evaluate(&rows, &def);
        for (x, y) in a.buckets.iter().zip(&b.buckets) {
            assert_eq!(x.totals.available.to_bits(), y.totals.available.to_bits());
            assert_eq!(x.totals.committed.to_bits(), y.totals.committed.to_bits());
            assert_eq!(x.totals.disbursed.to_bits(), y.totals.disbursed.to_bits());
            assert_eq!(
                x.totals.appropriation_balance.to_bits(),
                y.totals.appropriation_balance.to_bits()
            );
            assert_eq!(x.totals.unexecuted.to_bits(), y.totals.unexecuted.to_bits());
        }
    }

    #[test]
    fn test_empty_match_is_zero_not_error() {
        let rows = classify(vec![row(
            "  O23101010010101",
            "O231010100101 Sueldo básico",
            "Some Other Source",
            100.0,
            0.0,
        )]);
        let report = evaluate(&rows, &funding_summary());
        assert!(report.buckets.iter().all(|b| b.totals.is_zero()));
        assert!(!report.has_matches());
    }

    #[test]
    fn test_matching_rows_with_empty_amounts_total_zero() {
        // Missing numerics come out of the loader as zeros; a bucket whose
        // rows carry nothing still totals cleanly.
        let rows = classify(vec![
            row("  O23101010010101", "O231010100101 Sueldo básico", SOURCE_SGP_CSF, 0.0, 0.0),
            row("", "", SOURCE_SGP_CSF, 0.0, 0.0),
        ]);
        let report = evaluate(&rows, &funding_summary());
        let csf = report.get("SGP CSF (Salarios + Parafiscales)").unwrap();
        assert_eq!(csf.matched, 2);
        assert!(csf.totals.is_zero());
        assert!(report.has_matches());
    }

    #[test]
    fn test_no_rows_at_all() {
        let report = evaluate(&[], &funding_summary());
        assert_eq!(report.buckets.len(), 12);
        assert!(report.buckets.iter().all(|b| b.totals.is_zero()));
        assert!(!report.has_matches());
    }

    #[test]
    fn test_own_resources_band_partitioning() {
        let rows = classify(vec![
            row("  O23101010010105", "O231010100101 Sueldo básico", SOURCE_OWN, 10.0, 0.0),
            row("  O23101010010125", "O231010100101 Sueldo básico", SOURCE_OWN, 20.0, 0.0),
            row("  O23101010010140", "O231010100101 Sueldo básico", SOURCE_OWN, 40.0, 0.0),
        ]);
        let infancia = evaluate(&rows, &own_resources(Band::PrimeraInfancia));
        assert_eq!(infancia.get("SUELDO BASICO").unwrap().totals.available, 10.0);
        let orientadores = evaluate(&rows, &own_resources(Band::Orientadores));
        assert_eq!(orientadores.get("SUELDO BASICO").unwrap().totals.available, 20.0);
        let global = evaluate(&rows, &own_resources(Band::Global));
        assert_eq!(global.get("SUELDO BASICO").unwrap().totals.available, 40.0);
        // The Total band spans all three.
        let total = evaluate(&rows, &own_resources(Band::Total));
        assert_eq!(total.get("SUELDO BASICO").unwrap().totals.available, 70.0);
        assert_eq!(total.get("SUELDOS").unwrap().totals.available, 70.0);
        assert_eq!(total.get("DOC REC PROPIOS").unwrap().totals.available, 70.0);
    }

    #[test]
    fn test_cross_category_grand_total() {
        let report = evaluate(&sample_rows(), &funding_summary());
        let sgp = report.get("TOTAL SGP P8033").unwrap().totals;
        let own = report.get("TOTAL RECURSOS PROPIOS P8033").unwrap().totals;
        let grand = report.get("TOTAL SGP+RP P8033").unwrap().totals;
        assert_eq!(grand.available, sgp.available + own.available);
        assert_eq!(grand.disbursed, sgp.disbursed + own.disbursed);
    }
}
