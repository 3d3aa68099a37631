//! Usage analytics — pure aggregation over usage samples and template stats.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::category::CategoryRow;
use crate::usage::store::{TemplateStat, UsageSample};

pub const DEFAULT_PERIOD_DAYS: u32 = 30;
pub const MAX_PERIOD_DAYS: u32 = 365;
const TOP_TEMPLATES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyUsage {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateUsage {
    pub template_id: Uuid,
    pub title: String,
    pub uses: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryUsage {
    /// `None` groups uncategorized templates and events whose template was deleted.
    pub category_id: Option<Uuid>,
    pub name: String,
    pub uses: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub period_days: u32,
    pub total_templates: usize,
    pub favorite_templates: usize,
    /// Sum of every template's lifetime `usage_count`.
    pub lifetime_uses: i64,
    pub period_uses: u32,
    pub daily: Vec<DailyUsage>,
    pub top_templates: Vec<TemplateUsage>,
    pub by_category: Vec<CategoryUsage>,
}

/// First instant (UTC midnight) included in a `days`-long window ending `today`.
pub fn period_start(today: NaiveDate, days: u32) -> DateTime<Utc> {
    let first = today - Duration::days(i64::from(days.max(1)) - 1);
    first.and_time(NaiveTime::MIN).and_utc()
}

pub fn summarize(
    samples: &[UsageSample],
    templates: &[TemplateStat],
    categories: &[CategoryRow],
    days: u32,
    today: NaiveDate,
) -> AnalyticsSummary {
    let days = days.max(1);
    let start = period_start(today, days);
    let in_period: Vec<&UsageSample> = samples
        .iter()
        .filter(|s| s.created_at >= start && s.created_at.date_naive() <= today)
        .collect();

    // Zero-filled day series, oldest first
    let first_day = start.date_naive();
    let mut daily: Vec<DailyUsage> = (0..days)
        .map(|offset| DailyUsage {
            date: first_day + Duration::days(i64::from(offset)),
            count: 0,
        })
        .collect();
    for sample in &in_period {
        let index = (sample.created_at.date_naive() - first_day).num_days();
        if let Some(day) = usize::try_from(index).ok().and_then(|i| daily.get_mut(i)) {
            day.count += 1;
        }
    }

    let by_template = templates
        .iter()
        .map(|t| (t.id, t))
        .collect::<HashMap<_, _>>();

    let mut per_template: HashMap<Uuid, u32> = HashMap::new();
    for sample in &in_period {
        if let Some(id) = sample.template_id.filter(|id| by_template.contains_key(id)) {
            *per_template.entry(id).or_default() += 1;
        }
    }
    let mut top_templates: Vec<TemplateUsage> = per_template
        .into_iter()
        .map(|(id, uses)| TemplateUsage {
            template_id: id,
            title: by_template[&id].title.clone(),
            uses,
        })
        .collect();
    top_templates.sort_by(|a, b| b.uses.cmp(&a.uses).then_with(|| a.title.cmp(&b.title)));
    top_templates.truncate(TOP_TEMPLATES);

    let category_names: HashMap<Uuid, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();
    let mut per_category: HashMap<Option<Uuid>, u32> = HashMap::new();
    for sample in &in_period {
        let category = sample
            .template_id
            .and_then(|id| by_template.get(&id))
            .and_then(|t| t.category_id)
            .filter(|id| category_names.contains_key(id));
        *per_category.entry(category).or_default() += 1;
    }
    let mut by_category: Vec<CategoryUsage> = per_category
        .into_iter()
        .map(|(category_id, uses)| CategoryUsage {
            category_id,
            name: category_id
                .and_then(|id| category_names.get(&id).copied())
                .unwrap_or("Uncategorized")
                .to_string(),
            uses,
        })
        .collect();
    by_category.sort_by(|a, b| b.uses.cmp(&a.uses).then_with(|| a.name.cmp(&b.name)));

    AnalyticsSummary {
        period_days: days,
        total_templates: templates.len(),
        favorite_templates: templates.iter().filter(|t| t.is_favorite).count(),
        lifetime_uses: templates.iter().map(|t| i64::from(t.usage_count)).sum(),
        period_uses: in_period.len() as u32,
        daily,
        top_templates,
        by_category,
    }
}
