//! User model for storage and API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID (UUID v4, also used as document ID)
    pub id: String,
    /// Email address (lowercased, unique via the email index)
    pub email: String,
    /// bcrypt password hash
    pub password_hash: String,
    /// Display name
    pub name: String,
    /// Body metrics
    #[serde(default)]
    pub body: BodyMetrics,
    /// Daily and long-term goals
    #[serde(default)]
    pub goals: Goals,
    /// Offset from UTC used to derive the user's calendar day
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// Cumulative XP (never decreases)
    #[serde(default)]
    pub xp: u64,
    /// Consecutive days with at least one workout
    #[serde(default)]
    pub current_streak: u32,
    /// Calendar day of the last qualifying workout
    #[serde(default)]
    pub last_activity_date: Option<NaiveDate>,
    /// When the account was created
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
    /// Last profile or progress update
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a freshly registered user with default goals and zeroed progress.
    pub fn new(id: String, email: String, password_hash: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            password_hash,
            name,
            body: BodyMetrics::default(),
            goals: Goals::default(),
            utc_offset_minutes: 0,
            xp: 0,
            current_streak: 0,
            last_activity_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The user's current calendar day.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        crate::time_utils::local_date(now, self.utc_offset_minutes)
    }
}

/// Biological sex as entered on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Body measurements entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BodyMetrics {
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub body_fat_pct: Option<f64>,
    pub gender: Option<Gender>,
    pub age: Option<u32>,
}

impl BodyMetrics {
    /// Body mass index, if height and weight are both known.
    pub fn bmi(&self) -> Option<f64> {
        let height_m = self.height_cm? / 100.0;
        let weight = self.weight_kg?;
        if height_m <= 0.0 || weight <= 0.0 {
            return None;
        }
        Some((weight / (height_m * height_m) * 10.0).round() / 10.0)
    }

    /// WHO BMI category label.
    pub fn bmi_category(&self) -> Option<&'static str> {
        let bmi = self.bmi()?;
        Some(match bmi {
            b if b < 18.5 => "underweight",
            b if b < 25.0 => "normal",
            b if b < 30.0 => "overweight",
            _ => "obese",
        })
    }
}

/// Long-term direction of the user's plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Lose,
    #[default]
    Maintain,
    Gain,
}

/// Daily targets and goal weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Goals {
    /// Target calorie intake per day (kcal)
    pub daily_calorie_goal: u32,
    /// Target calories burned through workouts per day (kcal)
    pub daily_burn_goal: u32,
    pub goal_weight_kg: Option<f64>,
    pub goal_type: GoalType,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            daily_calorie_goal: 2000,
            daily_burn_goal: 500,
            goal_weight_kg: None,
            goal_type: GoalType::Maintain,
        }
    }
}

/// Email uniqueness index entry, keyed by the encoded email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailIndex {
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new(
            "u1".to_string(),
            "a@b.c".to_string(),
            "hash".to_string(),
            "Ada".to_string(),
        );

        assert_eq!(user.xp, 0);
        assert_eq!(user.current_streak, 0);
        assert!(user.last_activity_date.is_none());
        assert_eq!(user.goals.daily_calorie_goal, 2000);
        assert_eq!(user.goals.daily_burn_goal, 500);
        assert_eq!(user.goals.goal_type, GoalType::Maintain);
    }

    #[test]
    fn test_bmi() {
        let body = BodyMetrics {
            height_cm: Some(180.0),
            weight_kg: Some(81.0),
            ..Default::default()
        };
        assert_eq!(body.bmi(), Some(25.0));
        assert_eq!(body.bmi_category(), Some("overweight"));

        let missing = BodyMetrics {
            weight_kg: Some(70.0),
            ..Default::default()
        };
        assert_eq!(missing.bmi(), None);
        assert_eq!(missing.bmi_category(), None);
    }
}
