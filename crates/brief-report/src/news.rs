//! News digest: recent coverage from mainstream financial outlets
//!
//! Unlike the sectioned reports this one is keyed by search keyword and
//! keeps only articles from an allow-listed set of outlets published within
//! the last ten days.

use crate::context::ReportContext;
use crate::error::Result;
use crate::EASTMONEY_UNCONFIGURED;
use brief_core::dates::parse_datetime_loose;
use brief_core::{Cell, Table};
use brief_data::{EastmoneyClient, NewsItem};
use chrono::{Duration, Local, NaiveDateTime};
use tracing::warn;

const NEWS_WINDOW_DAYS: i64 = 10;

const ALLOWED_SOURCES: [&str; 16] = [
    "证券时报网",
    "证券时报",
    "证券日报",
    "第一财经",
    "财联社",
    "财中社",
    "中国证券报",
    "中国经济网",
    "新华社",
    "新华财经",
    "中国新闻网",
    "每日经济新闻",
    "东方财富研究中心",
    "经济参考报",
    "经济日报",
    "人民日报",
];

/// Shape raw search hits into a clean chronological table
///
/// Keeps allow-listed outlets only, drops repeated titles, keeps articles
/// published within the window and sorts them oldest first. Articles whose
/// timestamp does not parse are dropped with the stale ones.
pub fn shape_news(items: &[NewsItem], now: NaiveDateTime) -> Result<Table> {
    let cutoff = now - Duration::days(NEWS_WINDOW_DAYS);

    let mut table = Table::empty(&["title", "content", "pub_time"]);
    for item in items {
        if !ALLOWED_SOURCES.contains(&item.source.as_str()) {
            continue;
        }
        table.push_row(vec![
            Cell::Text(item.title.clone()),
            Cell::Text(item.content.clone()),
            Cell::Text(item.pub_time.clone()),
        ])?;
    }

    Ok(table
        .dedup_keep_first("title")?
        .filter("pub_time", |cell| {
            cell.as_str()
                .and_then(parse_datetime_loose)
                .is_some_and(|ts| ts >= cutoff)
        })?
        .sorted_by("pub_time")?)
}

async fn news_digest(eastmoney: &EastmoneyClient, keyword: &str) -> Result<String> {
    let items = eastmoney.search_news(keyword).await?;
    let table = shape_news(&items, Local::now().naive_local())?;
    Ok(table.to_csv()?)
}

/// Build the news briefing for a batch of keywords
///
/// One block per keyword under a shared header; a failed search turns into
/// an inline failure line instead of aborting the briefing.
pub async fn news_report(context: &ReportContext, keywords: &[String]) -> String {
    let Some(eastmoney) = context.eastmoney() else {
        return EASTMONEY_UNCONFIGURED.to_string();
    };

    let mut report = String::from("# 新闻简报\n");
    for keyword in keywords {
        report.push_str(&format!("\n关键词: {keyword}\n"));
        match news_digest(eastmoney, keyword).await {
            Ok(csv) => {
                report.push_str(&csv);
                report.push('\n');
            }
            Err(e) => {
                warn!(keyword = %keyword, error = %e, "News search failed");
                report.push_str(&format!("获取新闻失败: {e}\n"));
            }
        }
    }
    report
}
