//! Result-document rendering: fixed-width plain-text tables and the JSON
//! document, sharing one grouped-statistics pass over the evaluator's
//! per-area counters.

use std::collections::HashMap;
use std::fmt::Write as _;

use astmops_core::area::{Area, NamedArea, GROUP_AREAS};
use astmops_core::counters::{Pd, Pfd, Pfd2, Pfid, Pid, Rpa, Ur};
use astmops_core::stats;
use astmops_pipeline::EvaluationResult;
use astmops_schema::MetricKey;
use serde_json::{json, Map, Value};

/// The percentile of the RPA distance-error distribution reported as a
/// single headline figure (distinct from `rpa_pic_percentile`, which
/// gates which reference samples qualify as a quality baseline).
const RPA_REPORT_PERCENTILE: f64 = 95.0;

struct AreaStat<T> {
    name: String,
    value: T,
}

struct GroupStat<T> {
    group: Area,
    total: T,
    sub_areas: Vec<AreaStat<T>>,
}

fn group_stats<T: Default + Clone>(counters: &HashMap<NamedArea, T>, merge: impl Fn(&mut T, &T)) -> Vec<GroupStat<T>> {
    let mut groups = Vec::new();
    for &group in &GROUP_AREAS {
        let mut total = T::default();
        let mut sub_areas: Vec<AreaStat<T>> = counters
            .iter()
            .filter(|(named, _)| named.area.belongs_to(group))
            .map(|(named, value)| {
                merge(&mut total, value);
                AreaStat {
                    name: named.full_name(),
                    value: value.clone(),
                }
            })
            .collect();
        sub_areas.sort_by(|a, b| a.name.cmp(&b.name));
        if !sub_areas.is_empty() {
            groups.push(GroupStat { group, total, sub_areas });
        }
    }
    groups
}

fn percent_value(p: f64) -> Value {
    if p.is_nan() {
        Value::String("NaN".to_string())
    } else {
        json!(p * 100.0)
    }
}

fn percent_text(p: f64) -> String {
    if p.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:6.2}%", p * 100.0)
    }
}

fn rpa_json(rpa: &Rpa) -> Value {
    if rpa.distances.is_empty() {
        return json!({"mean": "NaN", "std_dev": "NaN", "p95": "NaN", "n": 0});
    }
    json!({
        "mean": stats::mean(&rpa.distances),
        "std_dev": stats::std_dev(&rpa.distances),
        "p95": stats::percentile(&rpa.distances, RPA_REPORT_PERCENTILE),
        "n": rpa.distances.len(),
    })
}

fn rpa_text(rpa: &Rpa) -> String {
    if rpa.distances.is_empty() {
        return "n=0".to_string();
    }
    format!(
        "n={:<6} mean={:7.2}m std={:7.2}m p95={:7.2}m",
        rpa.distances.len(),
        stats::mean(&rpa.distances),
        stats::std_dev(&rpa.distances),
        stats::percentile(&rpa.distances, RPA_REPORT_PERCENTILE)
    )
}

/// Render every metric's grouped statistics into the result-document's
/// JSON shape: `{"type": "astmops 1.0", "<metric>": {group: {...}}}`.
pub fn render_json(result: &EvaluationResult) -> Value {
    let mut doc = Map::new();
    doc.insert("type".to_string(), json!("astmops 1.0"));

    let scalar = |groups: Vec<GroupStat<f64>>| -> Value {
        let mut out = Map::new();
        for g in groups {
            let mut sub_areas = Map::new();
            for s in &g.sub_areas {
                sub_areas.insert(s.name.clone(), json!({"value": percent_value(s.value)}));
            }
            out.insert(
                g.group.to_string(),
                json!({"value": percent_value(g.total), "sub_areas": sub_areas}),
            );
        }
        Value::Object(out)
    };

    let ur_groups = |counters: &HashMap<NamedArea, Ur>| group_stats(counters, |t, o| t.add(*o));
    let pd_groups = |counters: &HashMap<NamedArea, Pd>| group_stats(counters, |t, o| t.add(*o));

    doc.insert(
        MetricKey::Ed116Ur.to_string(),
        scalar(percentages(ur_groups(&result.smr_ur), |v| v.percentage())),
    );
    doc.insert(
        MetricKey::Ed116Pd.to_string(),
        scalar(percentages(pd_groups(&result.smr_pd), |v| v.percentage())),
    );
    doc.insert(
        MetricKey::Ed116Pfd.to_string(),
        scalar(percentages(
            group_stats(&result.smr_pfd, |t: &mut Pfd2, o| t.add(*o)),
            |v| v.percentage(),
        )),
    );
    doc.insert(
        MetricKey::Ed117Ur.to_string(),
        scalar(percentages(ur_groups(&result.mlat_ur), |v| v.percentage())),
    );
    doc.insert(
        MetricKey::Ed117Pd.to_string(),
        scalar(percentages(pd_groups(&result.mlat_pd), |v| v.percentage())),
    );
    doc.insert(
        MetricKey::Ed117Pfd.to_string(),
        scalar(percentages(
            group_stats(&result.mlat_pfd, |t: &mut Pfd, o| t.add(*o)),
            |v| v.percentage(),
        )),
    );
    doc.insert(
        MetricKey::Ed117PidIdent.to_string(),
        scalar(percentages(
            group_stats(&result.mlat_pid_ident, |t: &mut Pid, o| t.add(*o)),
            |v| v.percentage(),
        )),
    );
    doc.insert(
        MetricKey::Ed117PidMode3a.to_string(),
        scalar(percentages(
            group_stats(&result.mlat_pid_mode3a, |t: &mut Pid, o| t.add(*o)),
            |v| v.percentage(),
        )),
    );
    doc.insert(
        MetricKey::Ed117PfidIdent.to_string(),
        scalar(percentages(
            group_stats(&result.mlat_pfid_ident, |t: &mut Pfid, o| t.add(*o)),
            |v| v.percentage(),
        )),
    );
    doc.insert(
        MetricKey::Ed117PfidMode3a.to_string(),
        scalar(percentages(
            group_stats(&result.mlat_pfid_mode3a, |t: &mut Pfid, o| t.add(*o)),
            |v| v.percentage(),
        )),
    );
    doc.insert(
        MetricKey::Ed117Plg.to_string(),
        scalar(percentages(
            group_stats(&result.mlat_plg, |t: &mut astmops_core::counters::Plg, o| t.add(*o)),
            |v| v.percentage(),
        )),
    );

    let rpa_doc = |groups: Vec<GroupStat<Rpa>>| -> Value {
        let mut out = Map::new();
        for g in groups {
            let mut sub_areas = Map::new();
            for s in &g.sub_areas {
                sub_areas.insert(s.name.clone(), rpa_json(&s.value));
            }
            let mut entry = rpa_json(&g.total).as_object().unwrap().clone();
            entry.insert("sub_areas".to_string(), Value::Object(sub_areas));
            out.insert(g.group.to_string(), Value::Object(entry));
        }
        Value::Object(out)
    };
    doc.insert(
        MetricKey::Ed116Rpa.to_string(),
        rpa_doc(group_stats(&result.smr_rpa, |t: &mut Rpa, o| t.add(o))),
    );
    doc.insert(
        MetricKey::Ed117Rpa.to_string(),
        rpa_doc(group_stats(&result.mlat_rpa, |t: &mut Rpa, o| t.add(o))),
    );

    Value::Object(doc)
}

fn percentages<T>(groups: Vec<GroupStat<T>>, percentage: impl Fn(&T) -> f64) -> Vec<GroupStat<f64>> {
    groups
        .into_iter()
        .map(|g| GroupStat {
            group: g.group,
            total: percentage(&g.total),
            sub_areas: g
                .sub_areas
                .into_iter()
                .map(|s| AreaStat {
                    name: s.name,
                    value: percentage(&s.value),
                })
                .collect(),
        })
        .collect()
}

/// Render every metric's grouped statistics as fixed-width plain-text
/// tables on standard output.
pub fn render_text(result: &EvaluationResult) -> String {
    let mut out = String::new();

    let mut scalar_section = |title: &str, groups: Vec<GroupStat<f64>>| {
        let _ = writeln!(out, "\n{title}");
        for g in &groups {
            let _ = writeln!(out, "  {:<14} {}", g.group.to_string(), percent_text(g.total));
            for s in &g.sub_areas {
                let _ = writeln!(out, "    {:<24} {}", s.name, percent_text(s.value));
            }
        }
    };

    scalar_section("ED116UR", percentages(group_stats(&result.smr_ur, |t, o| t.add(*o)), |v| v.percentage()));
    scalar_section("ED116PD", percentages(group_stats(&result.smr_pd, |t, o| t.add(*o)), |v| v.percentage()));
    scalar_section(
        "ED116PFD",
        percentages(group_stats(&result.smr_pfd, |t: &mut Pfd2, o| t.add(*o)), |v| v.percentage()),
    );
    scalar_section("ED117UR", percentages(group_stats(&result.mlat_ur, |t, o| t.add(*o)), |v| v.percentage()));
    scalar_section("ED117PD", percentages(group_stats(&result.mlat_pd, |t, o| t.add(*o)), |v| v.percentage()));
    scalar_section(
        "ED117PFD",
        percentages(group_stats(&result.mlat_pfd, |t: &mut Pfd, o| t.add(*o)), |v| v.percentage()),
    );
    scalar_section(
        "ED117PID_Ident",
        percentages(group_stats(&result.mlat_pid_ident, |t: &mut Pid, o| t.add(*o)), |v| v.percentage()),
    );
    scalar_section(
        "ED117PID_Mode3A",
        percentages(group_stats(&result.mlat_pid_mode3a, |t: &mut Pid, o| t.add(*o)), |v| v.percentage()),
    );
    scalar_section(
        "ED117PFID_Ident",
        percentages(group_stats(&result.mlat_pfid_ident, |t: &mut Pfid, o| t.add(*o)), |v| v.percentage()),
    );
    scalar_section(
        "ED117PFID_Mode3A",
        percentages(group_stats(&result.mlat_pfid_mode3a, |t: &mut Pfid, o| t.add(*o)), |v| v.percentage()),
    );
    scalar_section(
        "ED117PLG",
        percentages(
            group_stats(&result.mlat_plg, |t: &mut astmops_core::counters::Plg, o| t.add(*o)),
            |v| v.percentage(),
        ),
    );

    let _ = writeln!(out, "\nED116RPA");
    for g in group_stats(&result.smr_rpa, |t: &mut Rpa, o| t.add(o)) {
        let _ = writeln!(out, "  {:<14} {}", g.group.to_string(), rpa_text(&g.total));
        for s in &g.sub_areas {
            let _ = writeln!(out, "    {:<24} {}", s.name, rpa_text(&s.value));
        }
    }
    let _ = writeln!(out, "\nED117RPA");
    for g in group_stats(&result.mlat_rpa, |t: &mut Rpa, o| t.add(o)) {
        let _ = writeln!(out, "  {:<14} {}", g.group.to_string(), rpa_text(&g.total));
        for s in &g.sub_areas {
            let _ = writeln!(out, "    {:<24} {}", s.name, rpa_text(&s.value));
        }
    }

    out
}
