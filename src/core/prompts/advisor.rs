use serde_json::Value;
use std::str::FromStr;

use super::{Language, PromptPair, json_system};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisType {
    /// Campaign health check from performance metrics.
    Diagnosis,
    /// Rewrite of underperforming ad copy.
    Copy,
    /// Budget, bidding and targeting changes.
    Optimization,
    /// Audience segments and lookalikes.
    Audience,
}

impl FromStr for AnalysisType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "diagnosis" | "diagnose" | "campaign_diagnosis" => Ok(AnalysisType::Diagnosis),
            "copy" | "ad_copy" | "copywriting" => Ok(AnalysisType::Copy),
            "optimization" | "optimize" | "optimisation" => Ok(AnalysisType::Optimization),
            "audience" | "targeting" => Ok(AnalysisType::Audience),
            other => Err(format!("Unknown analysis type: {}", other)),
        }
    }
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Diagnosis => "diagnosis",
            AnalysisType::Copy => "copy",
            AnalysisType::Optimization => "optimization",
            AnalysisType::Audience => "audience",
        }
    }

    fn shape(&self) -> &'static str {
        match self {
            AnalysisType::Diagnosis => {
                r#"{"overallHealth":"good|warning|critical","score":0,"summary":"...","issues":[{"metric":"...","problem":"...","impact":"high|medium|low","fix":"..."}],"quickWins":["..."]}"#
            }
            AnalysisType::Copy => {
                r#"{"analysis":"...","variations":[{"headline":"...","primaryText":"...","cta":"...","whyItWorks":"..."}]}"#
            }
            AnalysisType::Optimization => {
                r#"{"budget":{"recommendation":"...","reallocation":["..."]},"bidding":"...","targeting":["..."],"creative":["..."],"expectedImpact":"..."}"#
            }
            AnalysisType::Audience => {
                r#"{"segments":[{"name":"...","description":"...","ageRange":"...","interests":["..."],"platforms":["..."]}],"lookalikes":["..."],"exclusions":["..."]}"#
            }
        }
    }

    fn task(&self) -> &'static str {
        match self {
            AnalysisType::Diagnosis => {
                "Diagnose this campaign. Compare CTR, CPC, CPM, conversion rate and ROAS against typical e-commerce benchmarks, rank the problems by impact and give a fix for each."
            }
            AnalysisType::Copy => {
                "Explain briefly why the current copy underperforms, then write 3 improved ad variations."
            }
            AnalysisType::Optimization => {
                "Recommend concrete budget, bidding, targeting and creative changes, and estimate their impact."
            }
            AnalysisType::Audience => {
                "Propose 3 to 5 audience segments to target, lookalike seeds and audiences to exclude."
            }
        }
    }
}

pub fn advisor_prompt(kind: AnalysisType, context: &Value, lang: Language) -> PromptPair {
    let role = "You are a senior media buyer and growth advisor for e-commerce brands running Meta, TikTok, Snapchat and Google ads.";
    let context_text = match context {
        Value::Null => "(no data provided)".to_string(),
        Value::String(s) => s.trim().to_string(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    };
    PromptPair {
        system: json_system(role, lang, kind.shape()),
        user: format!("Campaign data:\n{}\n\n{}", context_text, kind.task()),
    }
}
