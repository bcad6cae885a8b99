//! Lessons appended to every completion report.

use crate::domain::Location;

const GENERAL: [&str; 3] = [
  "⚡ Remember: DROP, COVER, HOLD ON is the universal response",
  "📱 Have emergency contacts saved in your phone",
  "🎒 Prepare an emergency kit for your home and workplace",
];

fn location_specific(location: Location) -> &'static [&'static str] {
  match location {
    Location::Apartment => &[
      "🏠 Keep emergency supplies in your bedroom for nighttime earthquakes",
      "🔦 Have a flashlight and sturdy shoes beside your bed",
      "📋 Practice Drop, Cover, Hold On from your bed",
    ],
    Location::Office => &[
      "🏢 Know your building's evacuation routes",
      "🚪 Never use elevators during or after an earthquake",
      "👥 Help colleagues but don't endanger yourself",
    ],
    Location::School => &[
      "🏫 Schools should practice earthquake drills regularly",
      "📚 Take cover under desks, away from windows",
      "👨‍🏫 Teachers: Stay calm and give clear directions",
    ],
    Location::Mall => &[
      "🏬 In crowded places, avoid panic and stampedes",
      "🚪 Know multiple exit routes",
      "🛍️ Don't stop to collect belongings during evacuation",
    ],
    Location::Other => &[],
  }
}

/// Location-specific lessons first, then the general ones.
pub fn lessons_for(location: Location) -> Vec<String> {
  location_specific(location)
    .iter()
    .chain(GENERAL.iter())
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_location_prepends_its_lessons() {
    let l = lessons_for(Location::Office);
    assert_eq!(l.len(), 6);
    assert!(l[1].contains("elevators"));
    assert!(l[3].contains("DROP, COVER, HOLD ON"));
  }

  #[test]
  fn school_lessons_keep_original_wording() {
    let l = lessons_for(Location::School);
    assert_eq!(l[2], "👨\u{200d}🏫 Teachers: Stay calm and give clear directions");
  }

  #[test]
  fn unknown_location_gets_general_only() {
    let l = lessons_for(Location::Other);
    assert_eq!(l, GENERAL.iter().map(|s| s.to_string()).collect::<Vec<_>>());
  }
}
