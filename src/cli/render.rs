use anyhow::Result;
use std::fmt::Write;

use crate::orchestrator::ComparisonReport;
use crate::stats::BrandReport;

pub fn render_report(report: &ComparisonReport, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(report)?);
    }
    let s = &report.summary;
    let mut out = String::new();
    writeln!(out, "{}", s.headline())?;
    writeln!(out, "Output: {}", s.output_file)?;
    if let Some(n) = s.reference_ids {
        writeln!(out, "Reference ids: {}", n)?;
    }
    if s.brands.is_empty() {
        writeln!(out, "Brands: (none)")?;
    } else {
        writeln!(out, "Brands ({}): {}", s.brands.len(), s.brands.join(", "))?;
    }
    Ok(out)
}

pub fn render_brand_report(report: &BrandReport, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(report)?);
    }
    let mut out = String::new();
    writeln!(out, "Total unmatched: {}", report.total_unmatched)?;
    let width = report
        .brand_stats
        .iter()
        .map(|b| b.brand.chars().count())
        .max()
        .unwrap_or(0)
        .max("Brand".len());
    writeln!(out, "{:<width$}  {:>7}  {:>8}", "Brand", "Count", "Percent")?;
    for b in &report.brand_stats {
        writeln!(
            out,
            "{:<width$}  {:>7}  {:>7.2}%",
            b.brand, b.count, b.percentage
        )?;
    }
    if !report.top_brands.is_empty() {
        let names: Vec<&str> = report.top_brands.iter().map(|b| b.brand.as_str()).collect();
        writeln!(out, "Top brands: {}", names.join(", "))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::summary::SummaryBuilder;
    use crate::stats::BrandStat;

    fn report() -> ComparisonReport {
        ComparisonReport {
            summary: SummaryBuilder::new("uploads/compare_product_id_vs_title.xlsx")
                .with_counts(1, 2, 1)
                .with_brands(vec!["Acme".into(), "Zeta".into()])
                .build(),
            matched_data: vec![],
            unmatched_data: vec![],
        }
    }

    #[test]
    fn text_report_has_headline_and_brands() {
        let out = render_report(&report(), false).unwrap();
        assert!(out.starts_with("Matched: 1, Unmatched: 2 → 1\n"));
        assert!(out.contains("Brands (2): Acme, Zeta"));
    }

    #[test]
    fn json_report_is_flat() {
        let out = render_report(&report(), true).unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["matched_count"], 1);
        assert_eq!(v["unmatched_final"], 1);
        assert!(v["matched_data"].as_array().unwrap().is_empty());
    }

    #[test]
    fn brand_table_lists_every_brand() {
        let stat = |brand: &str, count, percentage| BrandStat {
            brand: brand.into(),
            count,
            percentage,
        };
        let r = BrandReport {
            total_unmatched: 3,
            brand_stats: vec![stat("Acme", 2, 66.67), stat("Zeta", 1, 33.33)],
            top_brands: vec![stat("Acme", 2, 66.67)],
        };
        let out = render_brand_report(&r, false).unwrap();
        assert!(out.contains("Total unmatched: 3"));
        assert!(out.contains("66.67%"));
        assert!(out.contains("Top brands: Acme"));
    }
}
