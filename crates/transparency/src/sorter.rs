use alchemy_common::DistanceMetric;
use glam::Vec3;

/// A billboard with a fixed world position and its distance to the current
/// viewpoint.
///
/// `distance` is transient: it is only meaningful after a refresh against the
/// viewpoint of the frame being drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransparentObject {
    coords: Vec3,
    distance: f32,
}

impl TransparentObject {
    pub fn new(coords: Vec3) -> Self {
        Self {
            coords,
            distance: 0.0,
        }
    }

    pub fn coords(&self) -> Vec3 {
        self.coords
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }
}

impl From<Vec3> for TransparentObject {
    fn from(coords: Vec3) -> Self {
        Self::new(coords)
    }
}

/// Set every object's distance to its Euclidean distance from `viewpoint`.
/// Does not reorder.
pub fn refresh_distances(objects: &mut [TransparentObject], viewpoint: Vec3) {
    refresh_distances_with(objects, viewpoint, DistanceMetric::Euclidean);
}

/// Like [`refresh_distances`] with an explicit metric. Callers must sort
/// with distances from a single metric.
pub fn refresh_distances_with(
    objects: &mut [TransparentObject],
    viewpoint: Vec3,
    metric: DistanceMetric,
) {
    for object in objects.iter_mut() {
        object.distance = match metric {
            DistanceMetric::Euclidean => object.coords.distance(viewpoint),
            DistanceMetric::Squared => object.coords.distance_squared(viewpoint),
        };
    }
}

/// Sort farthest first. Unstable: ties end up in any order.
pub fn sort_back_to_front(objects: &mut [TransparentObject]) {
    objects.sort_unstable_by(|a, b| b.distance.total_cmp(&a.distance));
}

/// The scene's fixed list of transparent objects, kept in draw order.
///
/// Objects are supplied once at construction. Each [`update`](Self::update)
/// re-measures against the viewpoint and re-sorts in place.
#[derive(Debug, Clone, Default)]
pub struct TransparentSet {
    objects: Vec<TransparentObject>,
    metric: DistanceMetric,
}

impl TransparentSet {
    pub fn new(coords: impl IntoIterator<Item = Vec3>) -> Self {
        Self::with_metric(coords, DistanceMetric::default())
    }

    pub fn with_metric(coords: impl IntoIterator<Item = Vec3>, metric: DistanceMetric) -> Self {
        Self {
            objects: coords.into_iter().map(TransparentObject::new).collect(),
            metric,
        }
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Refresh distances from `viewpoint`, then sort back to front.
    pub fn update(&mut self, viewpoint: Vec3) {
        refresh_distances_with(&mut self.objects, viewpoint, self.metric);
        sort_back_to_front(&mut self.objects);
        tracing::trace!(
            count = self.objects.len(),
            farthest = self.objects.first().map(|o| o.distance),
            "transparent set sorted"
        );
    }

    /// Objects in current draw order.
    pub fn objects(&self) -> &[TransparentObject] {
        &self.objects
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransparentObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl<'a> IntoIterator for &'a TransparentSet {
    type Item = &'a TransparentObject;
    type IntoIter = std::slice::Iter<'a, TransparentObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}
