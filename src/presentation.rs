/// Display-facing views over a published snapshot.
///
/// This is the consumer contract for the external display layer: the AQI
/// pseudo-channel report plus one reading per classified channel. Views
/// are computed on demand from the latest `PostDetail` — classification
/// is recomputed from the raw parameter names on every read and never
/// stored alongside the data.

use crate::channels;
use crate::model::{Channel, Parameter, PostDetail};

// ---------------------------------------------------------------------------
// AQI pseudo-channel
// ---------------------------------------------------------------------------

/// The Air Quality Index report: the upstream-computed scalar plus its
/// descriptive texts and station metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct AqiReport {
    pub value: f64,
    pub index: i64,
    pub description: String,
    pub recommendation: String,
    pub updated: String,
    pub station_name: String,
    pub station_address: String,
    /// Upstream `description` field, e.g. "стаціонарний пост".
    pub station_type: String,
}

impl AqiReport {
    pub fn from_detail(detail: &PostDetail) -> Self {
        Self {
            value: detail.value,
            index: detail.index,
            description: detail.quality_desc.clone(),
            recommendation: detail.quality_recommendation.clone(),
            updated: detail.updated.clone(),
            station_name: detail.name.clone(),
            station_address: detail.address.clone(),
            station_type: detail.description.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Channel readings
// ---------------------------------------------------------------------------

/// One classified channel's displayable reading.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelReading {
    /// `None` means "no value": the zero-suppression case below.
    pub current_value: Option<f64>,
    pub daily_average: f64,
    /// Only populated when the upstream quality index is positive.
    pub quality_index: Option<i64>,
}

impl ChannelReading {
    /// Builds the reading for a parameter already classified as `channel`.
    ///
    /// For wind speed, wind direction, and ozone the upstream encodes
    /// "sensor offline" and "true zero" identically; when the daily
    /// average and quality index are both zero as well, the zero current
    /// value is suppressed rather than shown as a real reading.
    pub fn from_parameter(channel: Channel, param: &Parameter) -> Self {
        let suppress_zero = matches!(
            channel,
            Channel::WindSpeed | Channel::WindDirection | Channel::Ozone
        );

        let current_value = if suppress_zero
            && param.current_value == 0.0
            && param.avg_daily_value == 0.0
            && param.quality_index == 0
        {
            None
        } else {
            Some(param.current_value)
        };

        Self {
            current_value,
            daily_average: param.avg_daily_value,
            quality_index: (param.quality_index > 0).then_some(param.quality_index),
        }
    }
}

/// Returns one `(Channel, ChannelReading)` per classified parameter, in
/// the snapshot's parameter order. Unclassified parameters are skipped —
/// they remain visible in `detail.params` but have no channel view.
pub fn channel_readings(detail: &PostDetail) -> Vec<(Channel, ChannelReading)> {
    detail
        .params
        .iter()
        .filter_map(|param| {
            channels::classify(&param.name)
                .map(|ch| (ch, ChannelReading::from_parameter(ch, param)))
        })
        .collect()
}

/// Looks up the reading for one channel, or `None` when the latest
/// snapshot carries no parameter classifying to it. The first matching
/// parameter wins if the upstream ever reports a channel twice.
pub fn channel_reading(detail: &PostDetail, channel: Channel) -> Option<ChannelReading> {
    detail
        .params
        .iter()
        .find(|param| channels::classify(&param.name) == Some(channel))
        .map(|param| ChannelReading::from_parameter(channel, param))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
