//! Severe weather panel: alert map colors, SPC outlook imagery and the
//! fixed radar viewer catalog
//!
//! Everything here is deterministic URL and color selection; the images and
//! embedded viewers are consumed by the client as display resources and
//! never parsed.

use crate::models::AlertFeature;
use serde::{Deserialize, Serialize};

const SPC_PARTNERS_BASE: &str = "https://www.spc.noaa.gov/partners/outlooks/state";
const SPC_PRODUCTS_BASE: &str = "https://www.spc.noaa.gov/products";
const RIDGE_BASE: &str = "https://radar.weather.gov/ridge/standard";
const REGION_BASE: &str = "https://radar.weather.gov/region";

/// Map layer color for an alert polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertColor {
    Red,
    Yellow,
    Green,
    Blue,
}

impl AlertColor {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AlertColor::Red => "red",
            AlertColor::Yellow => "yellow",
            AlertColor::Green => "green",
            AlertColor::Blue => "blue",
        }
    }
}

/// Pick the polygon color for an alert by keyword match on the event name
///
/// The match is case-insensitive and ordered: tornado outranks the other
/// keywords when an event name somehow contains several.
#[must_use]
pub fn alert_color(event: &str) -> AlertColor {
    let event = event.to_lowercase();
    if event.contains("tornado") {
        AlertColor::Red
    } else if event.contains("severe thunderstorm") {
        AlertColor::Yellow
    } else if event.contains("flood") {
        AlertColor::Green
    } else {
        AlertColor::Blue
    }
}

/// An alert feature annotated with its map color, as served to the client
#[derive(Debug, Clone, Serialize)]
pub struct ColoredAlert {
    #[serde(flatten)]
    pub feature: AlertFeature,
    pub color: AlertColor,
}

impl From<AlertFeature> for ColoredAlert {
    fn from(feature: AlertFeature) -> Self {
        let color = alert_color(&feature.properties.event);
        Self { feature, color }
    }
}

/// Outlook forecast day (the SPC publishes days 1 through 3 individually)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutlookDay {
    Day1,
    Day2,
    Day3,
}

impl OutlookDay {
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            OutlookDay::Day1 => 1,
            OutlookDay::Day2 => 2,
            OutlookDay::Day3 => 3,
        }
    }

    #[must_use]
    pub const fn all() -> &'static [OutlookDay] {
        &[OutlookDay::Day1, OutlookDay::Day2, OutlookDay::Day3]
    }
}

impl TryFrom<u8> for OutlookDay {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(OutlookDay::Day1),
            2 => Ok(OutlookDay::Day2),
            3 => Ok(OutlookDay::Day3),
            _ => Err(anyhow::anyhow!(
                "Unknown outlook day '{value}'. Supported days: 1, 2, 3."
            )),
        }
    }
}

/// Hazard type selecting which outlook image to show for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardType {
    Categorical,
    #[serde(rename = "torn")]
    Tornado,
    Wind,
    Hail,
    #[serde(rename = "prob")]
    Probabilistic,
}

impl HazardType {
    /// The token the SPC uses in its image filenames
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HazardType::Categorical => "categorical",
            HazardType::Tornado => "torn",
            HazardType::Wind => "wind",
            HazardType::Hail => "hail",
            HazardType::Probabilistic => "prob",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [HazardType] {
        &[
            HazardType::Categorical,
            HazardType::Tornado,
            HazardType::Wind,
            HazardType::Hail,
            HazardType::Probabilistic,
        ]
    }
}

impl TryFrom<&str> for HazardType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "categorical" => Ok(HazardType::Categorical),
            "torn" | "tornado" => Ok(HazardType::Tornado),
            "wind" => Ok(HazardType::Wind),
            "hail" => Ok(HazardType::Hail),
            "prob" | "probabilistic" => Ok(HazardType::Probabilistic),
            _ => Err(anyhow::anyhow!(
                "Unknown hazard type '{value}'. Supported: categorical, torn, wind, hail, prob."
            )),
        }
    }
}

/// Build the static image URL for a (day, hazard) outlook selection
///
/// The SPC naming convention: categorical outlooks live under the partners
/// path as `swody{day}.png`; the day-3 probabilistic outlook is the one-off
/// `day3prob.gif`; everything else is `day{day}probotlk_{issuance}_{hazard}.gif`
/// with a 1200Z issuance for day 1 and 0600Z for later days.
#[must_use]
pub fn outlook_image_url(day: OutlookDay, hazard: HazardType) -> String {
    match (day, hazard) {
        (_, HazardType::Categorical) => {
            format!("{SPC_PARTNERS_BASE}/swody{}.png", day.number())
        }
        (OutlookDay::Day3, HazardType::Probabilistic) => {
            format!("{SPC_PRODUCTS_BASE}/outlook/day3prob.gif")
        }
        _ => {
            let issuance = if day == OutlookDay::Day1 { "1200" } else { "0600" };
            format!(
                "{SPC_PRODUCTS_BASE}/outlook/day{}probotlk_{issuance}_{}.gif",
                day.number(),
                hazard.as_str()
            )
        }
    }
}

/// Landing page for a day's outlook, linked from the image
#[must_use]
pub fn outlook_page_url(day: OutlookDay) -> String {
    format!("{SPC_PRODUCTS_BASE}/outlook/day{}otlk.html", day.number())
}

/// Fixed supplemental severe-weather products shown alongside the outlooks
#[derive(Debug, Clone, Serialize)]
pub struct SupplementalProducts {
    /// Day 4-8 probabilistic outlook image
    pub day4_8_outlook: &'static str,
    /// Currently valid mesoscale discussion graphic
    pub mesoscale_discussions: &'static str,
    /// WPC day 3-7 hazards outlook image
    pub wpc_hazards: &'static str,
}

impl SupplementalProducts {
    #[must_use]
    pub fn catalog() -> Self {
        Self {
            day4_8_outlook: "https://www.spc.noaa.gov/products/exper/day4-8/day48prob.gif",
            mesoscale_discussions: "https://www.spc.noaa.gov/products/md/validmd.png",
            wpc_hazards: "https://www.wpc.ncep.noaa.gov/threats/final/hazards_d3_7_contours.png",
        }
    }
}

/// Regional radar viewer selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RadarRegion {
    PacificNorthwest,
    NorthRockies,
    UpperMississippiValley,
    CentralGreatLakes,
    Northeast,
    PacificSouthwest,
    SouthernRockies,
    SouthernPlains,
    SouthernMississippiValley,
    Southeast,
    National,
}

impl RadarRegion {
    /// Human-readable label for the region selector
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RadarRegion::PacificNorthwest => "Pacific Northwest",
            RadarRegion::NorthRockies => "North Rockies",
            RadarRegion::UpperMississippiValley => "Upper Mississippi Valley",
            RadarRegion::CentralGreatLakes => "Central Great Lakes",
            RadarRegion::Northeast => "Northeast",
            RadarRegion::PacificSouthwest => "Pacific Southwest",
            RadarRegion::SouthernRockies => "Southern Rockies",
            RadarRegion::SouthernPlains => "Southern Plains",
            RadarRegion::SouthernMississippiValley => "Southern Mississippi Valley",
            RadarRegion::Southeast => "Southeast",
            RadarRegion::National => "National",
        }
    }

    /// Path slug used by radar.weather.gov
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            RadarRegion::PacificNorthwest => "pacnorthwest",
            RadarRegion::NorthRockies => "northrockies",
            RadarRegion::UpperMississippiValley => "uppermissvly",
            RadarRegion::CentralGreatLakes => "greatlakes",
            RadarRegion::Northeast => "northeast",
            RadarRegion::PacificSouthwest => "pacsouthwest",
            RadarRegion::SouthernRockies => "southrockies",
            RadarRegion::SouthernPlains => "southplains",
            RadarRegion::SouthernMississippiValley => "lowerMissvly",
            RadarRegion::Southeast => "southeast",
            RadarRegion::National => "national",
        }
    }

    /// Embeddable viewer URL for the region
    #[must_use]
    pub fn viewer_url(self) -> String {
        format!("{REGION_BASE}/{}/standard", self.slug())
    }

    #[must_use]
    pub const fn all() -> &'static [RadarRegion] {
        &[
            RadarRegion::PacificNorthwest,
            RadarRegion::NorthRockies,
            RadarRegion::UpperMississippiValley,
            RadarRegion::CentralGreatLakes,
            RadarRegion::Northeast,
            RadarRegion::PacificSouthwest,
            RadarRegion::SouthernRockies,
            RadarRegion::SouthernPlains,
            RadarRegion::SouthernMississippiValley,
            RadarRegion::Southeast,
            RadarRegion::National,
        ]
    }
}

/// Animated ridge radar loop for a single radar site, e.g. "KFFC"
#[must_use]
pub fn ridge_loop_url(site_id: &str) -> String {
    format!("{RIDGE_BASE}/{}_loop.gif", site_id.to_uppercase())
}

/// RainViewer embeddable map centered on the coordinates
#[must_use]
pub fn rainviewer_embed_url(latitude: f64, longitude: f64) -> String {
    format!(
        "https://www.rainviewer.com/map.html?loc={latitude},{longitude},7&oFa=0&oC=0&oU=0&oCS=1&oF=1&oAP=0&c=3&o=83&lm=1&th=0"
    )
}

/// Windy.com embeddable radar view centered on the coordinates
#[must_use]
pub fn windy_embed_url(latitude: f64, longitude: f64) -> String {
    format!(
        "https://embed.windy.com/embed2.html?lat={latitude}&lon={longitude}&width=650&height=450&zoom=7&level=surface&overlay=rain&product=ecmwf&menu=false&message=&marker=&calendar=now&pressure=true&type=map&location=coordinates&detail=false&metricWind=default&metricTemp=default&radarRange=-1"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Tornado Warning", AlertColor::Red)]
    #[case("TORNADO WATCH", AlertColor::Red)]
    #[case("Severe Thunderstorm Warning", AlertColor::Yellow)]
    #[case("severe thunderstorm watch", AlertColor::Yellow)]
    #[case("Flash Flood Warning", AlertColor::Green)]
    #[case("Coastal Flood Advisory", AlertColor::Green)]
    #[case("Heat Advisory", AlertColor::Blue)]
    #[case("Special Weather Statement", AlertColor::Blue)]
    fn test_alert_color_keyword_match(#[case] event: &str, #[case] expected: AlertColor) {
        assert_eq!(alert_color(event), expected);
    }

    #[rstest]
    #[case(OutlookDay::Day1, HazardType::Categorical, "https://www.spc.noaa.gov/partners/outlooks/state/swody1.png")]
    #[case(OutlookDay::Day2, HazardType::Categorical, "https://www.spc.noaa.gov/partners/outlooks/state/swody2.png")]
    #[case(OutlookDay::Day3, HazardType::Categorical, "https://www.spc.noaa.gov/partners/outlooks/state/swody3.png")]
    #[case(OutlookDay::Day3, HazardType::Probabilistic, "https://www.spc.noaa.gov/products/outlook/day3prob.gif")]
    #[case(OutlookDay::Day1, HazardType::Tornado, "https://www.spc.noaa.gov/products/outlook/day1probotlk_1200_torn.gif")]
    #[case(OutlookDay::Day1, HazardType::Wind, "https://www.spc.noaa.gov/products/outlook/day1probotlk_1200_wind.gif")]
    #[case(OutlookDay::Day1, HazardType::Hail, "https://www.spc.noaa.gov/products/outlook/day1probotlk_1200_hail.gif")]
    #[case(OutlookDay::Day2, HazardType::Tornado, "https://www.spc.noaa.gov/products/outlook/day2probotlk_0600_torn.gif")]
    #[case(OutlookDay::Day2, HazardType::Wind, "https://www.spc.noaa.gov/products/outlook/day2probotlk_0600_wind.gif")]
    #[case(OutlookDay::Day2, HazardType::Hail, "https://www.spc.noaa.gov/products/outlook/day2probotlk_0600_hail.gif")]
    fn test_outlook_image_url_convention(
        #[case] day: OutlookDay,
        #[case] hazard: HazardType,
        #[case] expected: &str,
    ) {
        assert_eq!(outlook_image_url(day, hazard), expected);
    }

    #[test]
    fn test_outlook_url_total_over_domain() {
        // Every (day, hazard) pair in the selector domain produces a URL.
        for &day in OutlookDay::all() {
            for &hazard in HazardType::all() {
                let url = outlook_image_url(day, hazard);
                assert!(url.starts_with("https://www.spc.noaa.gov/"));
                assert!(url.ends_with(".png") || url.ends_with(".gif"));
            }
        }
    }

    #[test]
    fn test_outlook_day_try_from() {
        assert_eq!(OutlookDay::try_from(1).unwrap(), OutlookDay::Day1);
        assert_eq!(OutlookDay::try_from(3).unwrap(), OutlookDay::Day3);
        assert!(OutlookDay::try_from(4).is_err());
    }

    #[test]
    fn test_hazard_type_try_from() {
        assert_eq!(
            HazardType::try_from("torn").unwrap(),
            HazardType::Tornado
        );
        assert_eq!(
            HazardType::try_from("Categorical").unwrap(),
            HazardType::Categorical
        );
        assert!(HazardType::try_from("snow").is_err());
    }

    #[test]
    fn test_region_viewer_urls() {
        assert_eq!(
            RadarRegion::Southeast.viewer_url(),
            "https://radar.weather.gov/region/southeast/standard"
        );
        assert_eq!(
            RadarRegion::SouthernMississippiValley.viewer_url(),
            "https://radar.weather.gov/region/lowerMissvly/standard"
        );
        assert_eq!(RadarRegion::all().len(), 11);
    }

    #[test]
    fn test_ridge_loop_url_uppercases_site() {
        assert_eq!(
            ridge_loop_url("kffc"),
            "https://radar.weather.gov/ridge/standard/KFFC_loop.gif"
        );
    }

    #[test]
    fn test_embed_urls_carry_coordinates() {
        let rain = rainviewer_embed_url(33.749, -84.388);
        assert!(rain.contains("loc=33.749,-84.388,7"));

        let windy = windy_embed_url(33.749, -84.388);
        assert!(windy.contains("lat=33.749"));
        assert!(windy.contains("lon=-84.388"));
    }

    #[test]
    fn test_colored_alert_from_feature() {
        let feature: AlertFeature = serde_json::from_str(
            r#"{"geometry": null, "properties": {"event": "Tornado Warning"}}"#,
        )
        .unwrap();
        let colored = ColoredAlert::from(feature);
        assert_eq!(colored.color, AlertColor::Red);
    }
}
