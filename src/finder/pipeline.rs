use super::params::FinderParams;
use crate::cluster::{ClusterParams, Clusterizer};
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{EventCounters, FinderReport, HoughDump, TimingBreakdown};
use crate::estimate::{ParameterEstimator, TrackCandidate};
use crate::geometry::HoughGeometry;
use crate::hits::HitRecord;
use crate::hough::{HoughSpace, HoughSpaceBuilder};
use crate::patterns::{CurveLookup, PatternLibrary, PatternLoadError};
use crate::relate::HitClusterRelator;
use log::debug;
use std::time::Instant;

/// Reasons a finder cannot be constructed.
#[derive(Debug)]
pub enum FinderError {
    Patterns(PatternLoadError),
    Params(String),
}

impl std::fmt::Display for FinderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinderError::Patterns(err) => write!(f, "{err}"),
            FinderError::Params(msg) => write!(f, "invalid finder parameters: {msg}"),
        }
    }
}

impl std::error::Error for FinderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FinderError::Patterns(err) => Some(err),
            FinderError::Params(_) => None,
        }
    }
}

impl From<PatternLoadError> for FinderError {
    fn from(err: PatternLoadError) -> Self {
        FinderError::Patterns(err)
    }
}

/// Event-by-event 3D Hough track finder.
///
/// The pattern library is read-only after construction; the Hough space and
/// the hit list are reused across events and cleared by [`init_event`].
///
/// [`init_event`]: TrackFinder::init_event
pub struct TrackFinder {
    params: FinderParams,
    cluster_params: ClusterParams,
    lookup: CurveLookup,
    builder: HoughSpaceBuilder,
    hits: Vec<HitRecord>,
}

impl TrackFinder {
    pub fn new(
        geometry: HoughGeometry,
        library: PatternLibrary,
        params: FinderParams,
    ) -> Result<Self, FinderError> {
        params.validate().map_err(FinderError::Params)?;
        let lookup = CurveLookup::new(geometry, library)?;
        let builder = HoughSpaceBuilder::new(&lookup);
        Ok(Self {
            cluster_params: params.cluster_params(),
            params,
            lookup,
            builder,
            hits: Vec::new(),
        })
    }

    /// Loads both pattern files named in `params` and builds the finder.
    pub fn from_files(geometry: HoughGeometry, params: FinderParams) -> Result<Self, FinderError> {
        let library = PatternLibrary::load(&geometry, &params.axial_file, &params.stereo_file)?;
        Self::new(geometry, library, params)
    }

    pub fn params(&self) -> &FinderParams {
        &self.params
    }

    pub fn geometry(&self) -> &HoughGeometry {
        self.lookup.geometry()
    }

    pub fn lookup(&self) -> &CurveLookup {
        &self.lookup
    }

    pub fn hits(&self) -> &[HitRecord] {
        &self.hits
    }

    /// Accumulated Hough space of the current event.
    pub fn space(&self) -> &HoughSpace {
        self.builder.space()
    }

    /// Drops the previous event's hits and zeroes the Hough space.
    pub fn init_event(&mut self) {
        self.hits.clear();
        self.builder.reset();
    }

    /// Records `hit` and adds its curve. Hits without a curve are still
    /// recorded so hit indices match the caller's order; returns whether the
    /// hit contributed.
    pub fn add_hit(&mut self, hit: HitRecord) -> bool {
        self.hits.push(hit);
        self.builder.add_hit(&self.lookup, &hit)
    }

    /// Clusters, relates and estimates on the current event.
    pub fn find_tracks(&self) -> Vec<TrackCandidate> {
        let mut timings = TimingBreakdown::default();
        let mut counters = EventCounters::default();
        self.run_stages(&mut timings, &mut counters)
    }

    /// Runs a full event: reset, accumulate `hits`, find tracks.
    pub fn process_event(&mut self, hits: &[HitRecord]) -> FinderReport {
        let total_start = Instant::now();
        self.init_event();
        for hit in hits {
            self.add_hit(*hit);
        }
        let mut timings = TimingBreakdown::default();
        timings.push("accumulate", elapsed_ms(total_start));

        let mut counters = EventCounters::default();
        let tracks = self.run_stages(&mut timings, &mut counters);
        let hough = self
            .params
            .store_readout
            .then(|| HoughDump::from_space(self.builder.space()));
        timings.total_ms = elapsed_ms(total_start);

        debug!(
            "event: {} hits ({} deposited), {} clusters, {} related, {} tracks in {:.3} ms",
            counters.hits,
            counters.deposited_hits,
            counters.clusters,
            counters.related_clusters,
            tracks.len(),
            timings.total_ms
        );
        FinderReport {
            tracks,
            counters,
            hough,
            timings,
        }
    }

    fn run_stages(
        &self,
        timings: &mut TimingBreakdown,
        counters: &mut EventCounters,
    ) -> Vec<TrackCandidate> {
        let space = self.builder.space();
        counters.hits = self.hits.len();
        counters.deposited_hits = self.builder.deposited();

        let start = Instant::now();
        let clusterizer = Clusterizer::new(self.lookup.geometry(), &self.cluster_params);
        let clusters = clusterizer.make_clusters(space);
        counters.clusters = clusters.len();
        let start = timings.lap("cluster", start);

        let relator = HitClusterRelator::new(&self.lookup, self.params.relator_params());
        let related = relator.relate_all(clusters, &self.hits);
        counters.related_clusters = related.len();
        let start = timings.lap("relate", start);

        let estimator = ParameterEstimator::new(self.lookup.geometry(), self.params.cog_threshold);
        let tracks: Vec<TrackCandidate> = related
            .into_iter()
            .map(|r| estimator.estimate(r, space, self.params.store_readout))
            .collect();
        timings.lap("estimate", start);

        for track in &tracks {
            debug!(
                "track: curvature={:.5}/cm azimuth={:.4} rad cot(theta)={:.4} hits={:?}",
                track.curvature, track.azimuth, track.polar_slope, track.related_hits
            );
        }
        tracks
    }
}
