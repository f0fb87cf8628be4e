// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};
use mapstory_feature::{
    Feature, Geometry, LabelStyle, LabelText, LayerStyle, Pen, Style, VectorStyle,
};
use mapstory_geom::Envelope;
use peniko::Color;
use smallvec::SmallVec;

use crate::{ClusterConfig, ClusterMode};

/// Features close enough on screen to share one label stack.
#[derive(Clone, Debug)]
pub struct Cluster {
    /// Union of the members' envelopes.
    pub envelope: Envelope,
    /// Members in the order they joined.
    pub members: SmallVec<[Feature; 4]>,
}

impl Cluster {
    fn new(feature: Feature, envelope: Envelope) -> Self {
        let mut members = SmallVec::new();
        members.push(feature);
        Self { envelope, members }
    }

    fn absorb(&mut self, other: Self) {
        self.envelope = self.envelope.join(&other.envelope);
        self.members.extend(other.members);
    }
}

/// Outline and fill of the box drawn around multi-member clusters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoxStyle {
    /// Box outline.
    pub outline: Pen,
    /// Box fill; `None` leaves the box hollow.
    pub fill: Option<Color>,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            outline: Pen::new(Color::from_rgba8(128, 128, 128, 255), 1.0),
            fill: None,
        }
    }
}

/// Groups features whose centroids lie within the merge distance of an
/// existing cluster.
///
/// Features are visited in ascending centroid Y (ties keep input order).
/// A feature is skipped when `style` does not resolve for it, or resolves
/// to a style that is disabled or not visible at `resolution`, and when it
/// has no envelope. Each remaining feature joins the first cluster whose
/// envelope, grown by the merge distance, contains its centroid; the
/// cluster's envelope then grows to include the feature. Otherwise the
/// feature starts a new cluster.
///
/// Under [`ClusterMode::Iterated`] clusters are then merged until no grown
/// envelope contains another cluster's centroid.
pub fn cluster_features(
    features: impl IntoIterator<Item = Feature>,
    style: &LayerStyle,
    resolution: f64,
    config: &ClusterConfig,
) -> Vec<Cluster> {
    let margin = config.merge_distance(resolution);

    let mut candidates: Vec<(Feature, Envelope)> = features
        .into_iter()
        .filter_map(|f| {
            let envelope = f.envelope()?;
            Some((f, envelope))
        })
        .collect();
    candidates.sort_by(|(_, a), (_, b)| a.centroid().y.total_cmp(&b.centroid().y));

    let mut clusters: Vec<Cluster> = Vec::new();
    for (feature, envelope) in candidates {
        let visible = style
            .resolve(&feature)
            .is_some_and(|s| s.is_visible_at(resolution));
        if !visible {
            continue;
        }
        let centroid = envelope.centroid();
        match clusters
            .iter_mut()
            .find(|c| c.envelope.grow(margin).contains(centroid))
        {
            Some(cluster) => {
                cluster.envelope = cluster.envelope.join(&envelope);
                cluster.members.push(feature);
            }
            None => clusters.push(Cluster::new(feature, envelope)),
        }
    }

    if config.mode == ClusterMode::Iterated {
        merge_until_stable(&mut clusters, margin);
    }
    clusters
}

fn merge_until_stable(clusters: &mut Vec<Cluster>, margin: f64) {
    'outer: loop {
        for i in 0..clusters.len() {
            let reach = clusters[i].envelope.grow(margin);
            if let Some(j) = (0..clusters.len())
                .find(|&j| j != i && reach.contains(clusters[j].envelope.centroid()))
            {
                let other = clusters.remove(j);
                let target = if j < i { i - 1 } else { i };
                clusters[target].absorb(other);
                continue 'outer;
            }
        }
        break;
    }
}

/// Turns clusters into a box feature per multi-member cluster followed by
/// one label feature per member.
///
/// The box is the cluster envelope grown by the box margin. Labels carry
/// `label_style` with the member's resolved text. They are anchored at the
/// horizontal center of the cluster envelope and at the lowest world Y of
/// that envelope rotated by `rotation` degrees about its center. Members are
/// stacked in ascending centroid Y: the first label is pushed down by half
/// a text line plus the box margin, each following one by another text
/// line.
///
/// Label features reuse their member's id; a box reuses the id of the
/// cluster's first member.
pub fn stack_labels(
    clusters: &[Cluster],
    label_style: &LabelStyle,
    box_style: &BoxStyle,
    resolution: f64,
    rotation: f64,
    config: &ClusterConfig,
) -> Vec<Feature> {
    let mut out = Vec::new();
    for cluster in clusters {
        if cluster.members.len() > 1 {
            let frame = cluster.envelope.grow(config.box_margin() * resolution);
            let style = VectorStyle {
                line: None,
                outline: Some(box_style.outline),
                fill: box_style.fill,
                ..VectorStyle::default()
            };
            out.push(
                Feature::new(cluster.members[0].id, Geometry::Rect(frame)).with_style(style),
            );
        }

        let center = cluster.envelope.centroid();
        let min_y = cluster
            .envelope
            .to_quad()
            .rotate(rotation, center)
            .to_bounding_box()
            .min_y();
        let anchor = Point::new(center.x, min_y);

        let mut ordered: Vec<&Feature> = cluster.members.iter().collect();
        ordered.sort_by(|a, b| centroid_y(a).total_cmp(&centroid_y(b)));

        let mut offset_y = config.text_height * 0.5 + config.box_margin();
        for member in ordered {
            let text = label_style.text_for(member).unwrap_or_default();
            let style = LabelStyle {
                text: LabelText::Fixed(text),
                offset: Vec2::new(label_style.offset.x, offset_y),
                ..label_style.clone()
            };
            out.push(Feature::new(member.id, anchor).with_style(Style::Label(style)));
            offset_y += config.text_height;
        }
    }
    out
}

fn centroid_y(feature: &Feature) -> f64 {
    feature.centroid().map_or(0.0, |c| c.y)
}
