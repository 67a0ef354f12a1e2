//! Background clip sequencing.
//!
//! Builds an ordered, non-repeating sequence of short background clips
//! whose total duration meets or exceeds a target (the synthesized
//! audio's length), alternating between the two camera angles of one
//! environment. The caller concatenates the sequence and trims the
//! reported excess from the tail.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rand::prelude::IndexedRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};
use crate::probe::probe_duration;

/// Recognized clip file extension.
pub const CLIP_EXTENSION: &str = "mp4";

/// Tolerance for floating-point duration comparisons.
pub const DURATION_EPSILON: f64 = 1e-6;

/// One of the two fixed camera angles within an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Angle {
    Angle1,
    Angle2,
}

impl Angle {
    /// The other angle.
    pub fn flip(self) -> Self {
        match self {
            Angle::Angle1 => Angle::Angle2,
            Angle::Angle2 => Angle::Angle1,
        }
    }

    /// Directory name of this angle's bucket.
    pub fn dir_name(self) -> &'static str {
        match self {
            Angle::Angle1 => "angle1",
            Angle::Angle2 => "angle2",
        }
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Opaque reference to one playable clip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClipRef {
    path: PathBuf,
}

impl ClipRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ClipRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Source of clips for one environment: enumerate a bucket, resolve a
/// clip's duration.
#[async_trait]
pub trait ClipSource: Send + Sync {
    /// Clip references in the given angle bucket.
    fn list(&self, angle: Angle) -> &[ClipRef];

    /// Resolve a clip's duration in seconds.
    async fn resolve_duration(&self, clip: &ClipRef) -> MediaResult<f64>;
}

/// Clip source backed by an environment directory on disk.
///
/// The directory layout is `<env>/angle1/*.mp4` and `<env>/angle2/*.mp4`.
/// Both buckets are scanned once at construction; the listing stays
/// immutable for the duration of a sequencing run.
#[derive(Debug)]
pub struct DirClipSource {
    angle1: Vec<ClipRef>,
    angle2: Vec<ClipRef>,
}

impl DirClipSource {
    /// Scan an environment directory.
    pub fn scan(env_dir: impl AsRef<Path>) -> MediaResult<Self> {
        let env_dir = env_dir.as_ref();
        Ok(Self {
            angle1: scan_bucket(&env_dir.join(Angle::Angle1.dir_name()))?,
            angle2: scan_bucket(&env_dir.join(Angle::Angle2.dir_name()))?,
        })
    }

    /// Total clips across both buckets.
    pub fn len(&self) -> usize {
        self.angle1.len() + self.angle2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angle1.is_empty() && self.angle2.is_empty()
    }
}

#[async_trait]
impl ClipSource for DirClipSource {
    fn list(&self, angle: Angle) -> &[ClipRef] {
        match angle {
            Angle::Angle1 => &self.angle1,
            Angle::Angle2 => &self.angle2,
        }
    }

    async fn resolve_duration(&self, clip: &ClipRef) -> MediaResult<f64> {
        probe_duration(clip.path()).await
    }
}

/// List clip files in one bucket directory, sorted by name.
///
/// A missing bucket directory is treated as empty rather than an error:
/// some environments only carry one angle.
fn scan_bucket(dir: &Path) -> MediaResult<Vec<ClipRef>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut clips = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_clip = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(CLIP_EXTENSION))
            .unwrap_or(false);
        if path.is_file() && is_clip {
            clips.push(ClipRef::new(path));
        }
    }
    clips.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(clips)
}

/// Pool of environments under a clips root directory.
///
/// Each environment subdirectory holds the two angle buckets. The
/// environment is selected once per sequencing run, either pinned by
/// the caller or drawn uniformly at random.
#[derive(Debug, Clone)]
pub struct ClipPool {
    root: PathBuf,
    environments: Vec<String>,
}

impl ClipPool {
    /// Scan the clips root for environment directories.
    pub fn scan(root: impl AsRef<Path>) -> MediaResult<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(MediaError::no_clips(format!(
                "clips root {} does not exist",
                root.display()
            )));
        }

        let mut environments = Vec::new();
        for entry in std::fs::read_dir(root)? {
            let path = entry?.path();
            let has_bucket = path.join(Angle::Angle1.dir_name()).is_dir()
                || path.join(Angle::Angle2.dir_name()).is_dir();
            if path.is_dir() && has_bucket {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    environments.push(name.to_string());
                }
            }
        }
        environments.sort();

        if environments.is_empty() {
            return Err(MediaError::no_clips(format!(
                "no environment directories under {}",
                root.display()
            )));
        }

        Ok(Self {
            root: root.to_path_buf(),
            environments,
        })
    }

    /// Names of the discovered environments.
    pub fn environments(&self) -> &[String] {
        &self.environments
    }

    /// Pick one environment uniformly at random.
    pub fn choose_environment<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.environments
            .choose(rng)
            .expect("pool always has at least one environment")
    }

    /// Open a clip source for the given environment.
    pub fn open(&self, environment: &str) -> MediaResult<DirClipSource> {
        if !self.environments.iter().any(|e| e == environment) {
            return Err(MediaError::no_clips(format!(
                "unknown environment '{}'",
                environment
            )));
        }
        DirClipSource::scan(self.root.join(environment))
    }
}

/// Result of one sequencing run.
#[derive(Debug, Clone)]
pub struct SequencePlan {
    /// Chosen clips in playback order.
    pub clips: Vec<ClipRef>,
    /// Sum of the chosen clips' durations in seconds.
    pub total_duration: f64,
    /// Amount to trim from the tail so the video matches the target.
    pub excess_duration: f64,
}

/// Per-run selection state.
///
/// Instantiated fresh inside [`sequence`] for every run, so consecutive
/// runs never share a used-set or angle cursor.
struct Sequencer {
    used: HashSet<ClipRef>,
    cursor: Angle,
    /// Clear the used-set once it reaches this size even if candidates
    /// remain, matching the original reuse policy of twice the largest
    /// bucket.
    reuse_reset_threshold: usize,
    /// Consecutive iterations that added no duration.
    stalled: usize,
    /// Give up after this many consecutive fruitless iterations.
    max_stalled: usize,
}

impl Sequencer {
    fn new<S: ClipSource + ?Sized>(source: &S) -> Self {
        let bucket1 = source.list(Angle::Angle1).len();
        let bucket2 = source.list(Angle::Angle2).len();
        let largest = bucket1.max(bucket2);
        Self {
            used: HashSet::new(),
            cursor: Angle::Angle1,
            reuse_reset_threshold: (2 * largest).max(1),
            stalled: 0,
            max_stalled: (2 * (bucket1 + bucket2)).max(8),
        }
    }

    /// True when no bucket holds any unused clip.
    fn exhausted<S: ClipSource + ?Sized>(&self, source: &S) -> bool {
        [Angle::Angle1, Angle::Angle2].iter().all(|&angle| {
            source
                .list(angle)
                .iter()
                .all(|clip| self.used.contains(clip))
        })
    }

    /// Draw the next candidate, flipping the angle cursor.
    ///
    /// Returns `None` when the active bucket is transiently empty of
    /// unused clips; the cursor still advances so alternation resumes
    /// on the other bucket.
    fn pick<S, R>(&mut self, source: &S, rng: &mut R) -> Option<ClipRef>
    where
        S: ClipSource + ?Sized,
        R: Rng + ?Sized,
    {
        if self.used.len() >= self.reuse_reset_threshold {
            debug!(
                used = self.used.len(),
                "Used-set reached reuse threshold, clearing"
            );
            self.used.clear();
        }

        let angle = self.cursor;
        self.cursor = self.cursor.flip();

        let candidates: Vec<&ClipRef> = source
            .list(angle)
            .iter()
            .filter(|clip| !self.used.contains(*clip))
            .collect();

        let Some(clip) = candidates.choose(rng).map(|c| (*c).clone()) else {
            debug!(%angle, "No unused clips in bucket, skipping turn");
            // Every bucket dry means the used-set itself is the blocker;
            // clearing it lets selection continue with reuse.
            if self.exhausted(source) && !self.used.is_empty() {
                self.used.clear();
            }
            return None;
        };

        self.used.insert(clip.clone());
        Some(clip)
    }
}

/// Assemble a clip sequence whose total duration meets or exceeds
/// `target_duration` seconds.
///
/// Clips alternate between the two angle buckets and are never repeated
/// within a reuse cycle. Clips whose duration cannot be resolved are
/// logged and skipped. Fails with [`MediaError::ZeroTargetDuration`]
/// when the target is not positive (the source is never consulted) and
/// with [`MediaError::NoClipsAvailable`] when the pool is empty or
/// selection stops making progress.
pub async fn sequence<S, R>(
    target_duration: f64,
    source: &S,
    rng: &mut R,
) -> MediaResult<SequencePlan>
where
    S: ClipSource + ?Sized,
    R: Rng + ?Sized,
{
    if target_duration <= 0.0 {
        return Err(MediaError::ZeroTargetDuration);
    }

    let mut state = Sequencer::new(source);

    if source.list(Angle::Angle1).is_empty() && source.list(Angle::Angle2).is_empty() {
        return Err(MediaError::no_clips("both angle buckets are empty"));
    }

    let mut clips = Vec::new();
    let mut total_duration = 0.0_f64;

    while total_duration < target_duration {
        if state.stalled >= state.max_stalled {
            return Err(MediaError::no_clips(format!(
                "no usable clip after {} consecutive attempts",
                state.stalled
            )));
        }

        let Some(clip) = state.pick(source, rng) else {
            state.stalled += 1;
            continue;
        };

        match source.resolve_duration(&clip).await {
            Ok(duration) if duration > 0.0 => {
                debug!(clip = %clip, duration, "Selected clip");
                clips.push(clip);
                total_duration += duration;
                state.stalled = 0;
            }
            Ok(duration) => {
                warn!(clip = %clip, duration, "Skipping clip with non-positive duration");
                state.stalled += 1;
            }
            Err(e) => {
                warn!(clip = %clip, error = %e, "Skipping clip, duration probe failed");
                state.stalled += 1;
            }
        }
    }

    let excess_duration = (total_duration - target_duration).max(0.0);

    Ok(SequencePlan {
        clips,
        total_duration,
        excess_duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    /// In-memory clip source with scripted durations.
    struct FakeSource {
        angle1: Vec<ClipRef>,
        angle2: Vec<ClipRef>,
        durations: HashMap<ClipRef, f64>,
        broken: HashSet<ClipRef>,
    }

    impl FakeSource {
        fn new(angle1: &[(&str, f64)], angle2: &[(&str, f64)]) -> Self {
            let mut durations = HashMap::new();
            let build = |specs: &[(&str, f64)], durations: &mut HashMap<ClipRef, f64>| {
                specs
                    .iter()
                    .map(|(name, dur)| {
                        let clip = ClipRef::new(*name);
                        durations.insert(clip.clone(), *dur);
                        clip
                    })
                    .collect::<Vec<_>>()
            };
            let angle1 = build(angle1, &mut durations);
            let angle2 = build(angle2, &mut durations);
            Self {
                angle1,
                angle2,
                durations,
                broken: HashSet::new(),
            }
        }

        fn with_broken(mut self, name: &str) -> Self {
            self.broken.insert(ClipRef::new(name));
            self
        }

        fn angle_of(&self, clip: &ClipRef) -> Angle {
            if self.angle1.contains(clip) {
                Angle::Angle1
            } else {
                Angle::Angle2
            }
        }
    }

    #[async_trait]
    impl ClipSource for FakeSource {
        fn list(&self, angle: Angle) -> &[ClipRef] {
            match angle {
                Angle::Angle1 => &self.angle1,
                Angle::Angle2 => &self.angle2,
            }
        }

        async fn resolve_duration(&self, clip: &ClipRef) -> MediaResult<f64> {
            if self.broken.contains(clip) {
                return Err(MediaError::probe_failed(clip.path(), "scripted failure"));
            }
            Ok(*self.durations.get(clip).expect("unknown clip"))
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[tokio::test]
    async fn test_total_meets_target_with_nonnegative_excess() {
        let source = FakeSource::new(&[("a1", 3.0), ("a2", 4.0)], &[("b1", 5.0), ("b2", 2.0)]);

        let plan = sequence(10.0, &source, &mut rng()).await.unwrap();

        assert!(plan.total_duration >= 10.0 - DURATION_EPSILON);
        assert!(plan.excess_duration >= 0.0);
        assert!((plan.excess_duration - (plan.total_duration - 10.0)).abs() < DURATION_EPSILON);
    }

    #[tokio::test]
    async fn test_spec_example_pool() {
        // A = {a1: 3s, a2: 4s}, B = {b1: 5s}, target 10s.
        let source = FakeSource::new(&[("a1", 3.0), ("a2", 4.0)], &[("b1", 5.0)]);

        let plan = sequence(10.0, &source, &mut rng()).await.unwrap();

        assert!(plan.total_duration >= 10.0);
        // All three clips are needed to reach 10s: 3 + 4 + 5 = 12.
        assert_eq!(plan.clips.len(), 3);
        assert!((plan.total_duration - 12.0).abs() < DURATION_EPSILON);
        assert!((plan.excess_duration - 2.0).abs() < DURATION_EPSILON);
    }

    #[tokio::test]
    async fn test_angles_alternate() {
        let source = FakeSource::new(
            &[("a1", 1.0), ("a2", 1.0), ("a3", 1.0)],
            &[("b1", 1.0), ("b2", 1.0), ("b3", 1.0)],
        );

        let plan = sequence(6.0, &source, &mut rng()).await.unwrap();

        for pair in plan.clips.windows(2) {
            assert_ne!(
                source.angle_of(&pair[0]),
                source.angle_of(&pair[1]),
                "consecutive clips drawn from the same bucket"
            );
        }
    }

    #[tokio::test]
    async fn test_alternation_survives_exhausted_bucket() {
        // One-clip bucket: once b1 is used, angle2 turns are skipped and
        // selection keeps drawing from angle1.
        let source = FakeSource::new(
            &[("a1", 1.0), ("a2", 1.0), ("a3", 1.0), ("a4", 1.0)],
            &[("b1", 1.0)],
        );

        let plan = sequence(5.0, &source, &mut rng()).await.unwrap();
        assert!(plan.total_duration >= 5.0);
    }

    #[tokio::test]
    async fn test_no_repeats_within_reuse_cycle() {
        let source = FakeSource::new(
            &[("a1", 1.0), ("a2", 1.0), ("a3", 1.0)],
            &[("b1", 1.0), ("b2", 1.0), ("b3", 1.0)],
        );

        // Target fits within one pass over the pool, so no clip may repeat.
        let plan = sequence(6.0, &source, &mut rng()).await.unwrap();

        let unique: HashSet<_> = plan.clips.iter().collect();
        assert_eq!(unique.len(), plan.clips.len());
    }

    #[tokio::test]
    async fn test_reuse_after_pool_smaller_than_target() {
        // Pool sums to 2s but target is 7s: clips must be reused across
        // used-set clears rather than failing.
        let source = FakeSource::new(&[("a1", 1.0)], &[("b1", 1.0)]);

        let plan = sequence(7.0, &source, &mut rng()).await.unwrap();
        assert!(plan.total_duration >= 7.0);
        assert!(plan.clips.len() >= 7);
    }

    #[tokio::test]
    async fn test_empty_pool_fails() {
        let source = FakeSource::new(&[], &[]);
        let err = sequence(10.0, &source, &mut rng()).await.unwrap_err();
        assert!(matches!(err, MediaError::NoClipsAvailable(_)));
    }

    #[tokio::test]
    async fn test_zero_target_fails_without_touching_source() {
        let source = FakeSource::new(&[("a1", 3.0)], &[]);
        let err = sequence(0.0, &source, &mut rng()).await.unwrap_err();
        assert!(matches!(err, MediaError::ZeroTargetDuration));
    }

    #[tokio::test]
    async fn test_failed_probe_is_skipped() {
        let source =
            FakeSource::new(&[("a1", 5.0), ("bad", 5.0)], &[("b1", 6.0)]).with_broken("bad");

        let plan = sequence(10.0, &source, &mut rng()).await.unwrap();

        assert!(plan.total_duration >= 10.0);
        assert!(!plan.clips.contains(&ClipRef::new("bad")));
    }

    #[tokio::test]
    async fn test_all_probes_failing_gives_up() {
        let source = FakeSource::new(&[("a1", 5.0)], &[("b1", 5.0)])
            .with_broken("a1")
            .with_broken("b1");

        let err = sequence(10.0, &source, &mut rng()).await.unwrap_err();
        assert!(matches!(err, MediaError::NoClipsAvailable(_)));
    }

    #[tokio::test]
    async fn test_runs_are_independent() {
        let source = FakeSource::new(&[("a1", 3.0), ("a2", 4.0)], &[("b1", 5.0)]);

        let first = sequence(10.0, &source, &mut rng()).await.unwrap();
        let second = sequence(10.0, &source, &mut rng()).await.unwrap();

        // Fresh state per run: the second run sees the full pool again.
        assert_eq!(first.clips.len(), second.clips.len());
        assert!((first.total_duration - second.total_duration).abs() < DURATION_EPSILON);
    }

    #[test]
    fn test_angle_flip() {
        assert_eq!(Angle::Angle1.flip(), Angle::Angle2);
        assert_eq!(Angle::Angle2.flip(), Angle::Angle1);
    }

    #[test]
    fn test_pool_scan_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let env = dir.path().join("studio");
        std::fs::create_dir_all(env.join("angle1")).unwrap();
        std::fs::create_dir_all(env.join("angle2")).unwrap();
        std::fs::write(env.join("angle1/one.mp4"), b"x").unwrap();
        std::fs::write(env.join("angle1/notes.txt"), b"x").unwrap();
        std::fs::write(env.join("angle2/two.MP4"), b"x").unwrap();
        // A directory without angle buckets is not an environment.
        std::fs::create_dir_all(dir.path().join("scratch")).unwrap();

        let pool = ClipPool::scan(dir.path()).unwrap();
        assert_eq!(pool.environments(), &["studio".to_string()]);

        let source = pool.open("studio").unwrap();
        assert_eq!(source.list(Angle::Angle1).len(), 1);
        assert_eq!(source.list(Angle::Angle2).len(), 1);

        assert!(pool.open("missing").is_err());
    }

    #[test]
    fn test_pool_scan_empty_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClipPool::scan(dir.path()).unwrap_err();
        assert!(matches!(err, MediaError::NoClipsAvailable(_)));
    }
}
