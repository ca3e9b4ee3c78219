//! Job posting quota rules.
//!
//! `may_post` is the only admission predicate in the crate. The HTTP quota
//! view reports it to clients as `canPostJob`, and the job service enforces
//! it when granting a posting, so the two can never disagree.

use serde::Serialize;

use crate::{entity::company, prelude::*};

/// `job_postings_remaining` value meaning "no limit".
pub const UNLIMITED: i32 = -1;

/// Whether a company may publish one more job.
///
/// Recruitment clients bypass the counter entirely. Otherwise only the
/// unlimited sentinel or a positive counter admits; zero, a missing counter
/// and any other negative value reject.
pub fn may_post(is_recruitment_client: bool, remaining: Option<i32>) -> bool {
  if is_recruitment_client {
    return true;
  }

  match remaining {
    Some(UNLIMITED) => true,
    Some(n) => n > 0,
    None => false,
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaView {
  pub company_id: String,
  pub plan_id: Option<String>,
  pub job_postings_remaining: Option<i32>,
  pub is_recruitment_client: bool,
  pub unlimited: bool,
  pub can_post_job: bool,
  pub subscription_end_date: Option<DateTime>,
}

impl From<&company::Model> for QuotaView {
  fn from(company: &company::Model) -> Self {
    Self {
      company_id: company.id.clone(),
      plan_id: company.plan_id.clone(),
      job_postings_remaining: company.job_postings_remaining,
      is_recruitment_client: company.is_recruitment_client,
      unlimited: company.is_recruitment_client
        || company.job_postings_remaining == Some(UNLIMITED),
      can_post_job: company.may_post(),
      subscription_end_date: company.subscription_end_date,
    }
  }
}
