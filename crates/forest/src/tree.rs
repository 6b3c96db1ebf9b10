use crate::parameters::ForestValidParams;
use linfa::Float;
use ndarray::{ArrayBase, ArrayView1, ArrayView2, Data, Ix1};
use ndarray_rand::rand::Rng;
use ndarray_rand::rand::seq::index;

/// Variance under which a node is considered pure
const VARIANCE_EPSILON: f64 = 1e-12;
/// 2 * pi * e, constant factor of the gaussian differential entropy
const TWO_PI_E: f64 = 2. * std::f64::consts::PI * std::f64::consts::E;

/// Gaussian summary of the training targets reaching a leaf
#[derive(Clone, Debug, PartialEq)]
pub struct Leaf<F: Float> {
    /// Mean of the targets
    pub mean: F,
    /// Population variance of the targets
    pub variance: F,
    /// Number of training samples
    pub n_samples: usize,
}

#[derive(Clone, Debug)]
enum TreeNode<F: Float> {
    Split {
        feature: usize,
        threshold: F,
        left: Box<TreeNode<F>>,
        right: Box<TreeNode<F>>,
    },
    Leaf(Leaf<F>),
}

/// A randomized regression tree whose leaves predict a gaussian (mean, variance).
///
/// Split thresholds are drawn at random within the range of the node samples
/// and the best one regarding gaussian entropy gain is retained.
#[derive(Clone, Debug)]
pub struct RegressionTree<F: Float> {
    root: TreeNode<F>,
}

struct Split<F> {
    feature: usize,
    threshold: F,
    gain: F,
}

impl<F: Float> RegressionTree<F> {
    /// Grow a tree on the whole (x, y) training set
    pub(crate) fn grow<R: Rng>(
        x: &ArrayView2<F>,
        y: &ArrayView1<F>,
        params: &ForestValidParams<F>,
        rng: &mut R,
    ) -> Self {
        let indices: Vec<usize> = (0..x.nrows()).collect();
        RegressionTree {
            root: grow_node(x, y, indices, 0, params, rng),
        }
    }

    /// Leaf reached by the given input point
    pub fn leaf(&self, x: &ArrayBase<impl Data<Elem = F>, Ix1>) -> &Leaf<F> {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] <= *threshold {
                        left
                    } else {
                        right
                    }
                }
                TreeNode::Leaf(leaf) => return leaf,
            }
        }
    }

    /// Depth of the tree, a single leaf tree having depth 0
    pub fn depth(&self) -> usize {
        fn depth_of<F: Float>(node: &TreeNode<F>) -> usize {
            match node {
                TreeNode::Split { left, right, .. } => 1 + depth_of(left).max(depth_of(right)),
                TreeNode::Leaf(_) => 0,
            }
        }
        depth_of(&self.root)
    }

    /// Number of leaves
    pub fn n_leaves(&self) -> usize {
        fn leaves_of<F: Float>(node: &TreeNode<F>) -> usize {
            match node {
                TreeNode::Split { left, right, .. } => leaves_of(left) + leaves_of(right),
                TreeNode::Leaf(_) => 1,
            }
        }
        leaves_of(&self.root)
    }
}

fn mean_var<F: Float>(y: &ArrayView1<F>, indices: &[usize]) -> (F, F) {
    let n = F::cast(indices.len());
    let mean = indices.iter().fold(F::zero(), |acc, &i| acc + y[i]) / n;
    let variance = indices
        .iter()
        .fold(F::zero(), |acc, &i| acc + (y[i] - mean) * (y[i] - mean))
        / n;
    (mean, variance)
}

fn gaussian_entropy<F: Float>(variance: F) -> F {
    F::cast(0.5) * (F::cast(TWO_PI_E) * (variance + F::cast(VARIANCE_EPSILON))).ln()
}

/// Variance of a sample given its count, sum and sum of squares
fn variance_from_sums<F: Float>(n: usize, sum: F, sum_sq: F) -> F {
    let n = F::cast(n);
    let mean = sum / n;
    let var = sum_sq / n - mean * mean;
    if var < F::zero() { F::zero() } else { var }
}

fn grow_node<F: Float, R: Rng>(
    x: &ArrayView2<F>,
    y: &ArrayView1<F>,
    indices: Vec<usize>,
    depth: usize,
    params: &ForestValidParams<F>,
    rng: &mut R,
) -> TreeNode<F> {
    let n_samples = indices.len();
    let (mean, variance) = mean_var(y, &indices);
    if n_samples < params.min_samples_split()
        || depth >= params.max_depth()
        || variance <= F::cast(VARIANCE_EPSILON)
    {
        return TreeNode::Leaf(Leaf {
            mean,
            variance,
            n_samples,
        });
    }

    match best_split(x, y, &indices, gaussian_entropy(variance), params, rng) {
        Some(split) if split.gain >= params.min_gain() => {
            let (left, right): (Vec<usize>, Vec<usize>) = indices
                .into_iter()
                .partition(|&i| x[[i, split.feature]] <= split.threshold);
            TreeNode::Split {
                feature: split.feature,
                threshold: split.threshold,
                left: Box::new(grow_node(x, y, left, depth + 1, params, rng)),
                right: Box::new(grow_node(x, y, right, depth + 1, params, rng)),
            }
        }
        _ => TreeNode::Leaf(Leaf {
            mean,
            variance,
            n_samples,
        }),
    }
}

fn best_split<F: Float, R: Rng>(
    x: &ArrayView2<F>,
    y: &ArrayView1<F>,
    indices: &[usize],
    parent_entropy: F,
    params: &ForestValidParams<F>,
    rng: &mut R,
) -> Option<Split<F>> {
    let nx = x.ncols();
    let n = F::cast(indices.len());
    let features = index::sample(rng, nx, params.n_features_per_node().min(nx));

    let mut best: Option<Split<F>> = None;
    for feature in features.iter() {
        let (lower, upper) = indices
            .iter()
            .fold((F::infinity(), F::neg_infinity()), |(lo, up), &i| {
                let v = x[[i, feature]];
                (if v < lo { v } else { lo }, if v > up { v } else { up })
            });
        if upper <= lower {
            continue;
        }
        for _ in 0..params.n_thresholds() {
            let u: f64 = rng.gen_range(0.0..1.0);
            let threshold = lower + (upper - lower) * F::cast(u);

            let (mut n_left, mut sum_left, mut sq_left) = (0, F::zero(), F::zero());
            let (mut n_right, mut sum_right, mut sq_right) = (0, F::zero(), F::zero());
            for &i in indices {
                let v = y[i];
                if x[[i, feature]] <= threshold {
                    n_left += 1;
                    sum_left += v;
                    sq_left += v * v;
                } else {
                    n_right += 1;
                    sum_right += v;
                    sq_right += v * v;
                }
            }
            if n_left < params.min_samples_leaf() || n_right < params.min_samples_leaf() {
                continue;
            }

            let children_entropy = F::cast(n_left) / n
                * gaussian_entropy(variance_from_sums(n_left, sum_left, sq_left))
                + F::cast(n_right) / n
                    * gaussian_entropy(variance_from_sums(n_right, sum_right, sq_right));
            let gain = parent_entropy - children_entropy;
            if best.as_ref().is_none_or(|b| gain > b.gain) {
                best = Some(Split {
                    feature,
                    threshold,
                    gain,
                });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ForestParams;
    use approx::assert_abs_diff_eq;
    use linfa::ParamGuard;
    use ndarray::{Array, Array1, Array2, Axis, array};
    use ndarray_rand::rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    fn step_data() -> (Array2<f64>, Array1<f64>) {
        let x = Array::linspace(0., 1., 40).insert_axis(Axis(1));
        let y = x.column(0).mapv(|v| if v < 0.5 { 0. } else { 10. });
        (x, y)
    }

    #[test]
    fn test_constant_targets_give_single_leaf() {
        let x = Array::linspace(0., 1., 30).insert_axis(Axis(1));
        let y = Array1::from_elem(30, 2.5);
        let params = ForestParams::new().check().unwrap();
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let tree = RegressionTree::grow(&x.view(), &y.view(), &params, &mut rng);
        assert_eq!(tree.n_leaves(), 1);
        let leaf = tree.leaf(&array![0.3]);
        assert_abs_diff_eq!(leaf.mean, 2.5);
        assert_abs_diff_eq!(leaf.variance, 0.);
        assert_eq!(leaf.n_samples, 30);
    }

    #[test]
    fn test_tree_respects_depth_and_leaf_size() {
        let (x, y) = step_data();
        let params = ForestParams::new()
            .max_depth(2)
            .min_samples_leaf(5)
            .min_samples_split(10)
            .n_thresholds(10)
            .check()
            .unwrap();
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let tree = RegressionTree::grow(&x.view(), &y.view(), &params, &mut rng);
        assert!(tree.depth() <= 2);
        assert!(tree.n_leaves() > 1);
        for row in x.rows() {
            assert!(tree.leaf(&row).n_samples >= 5);
        }
    }

    #[test]
    fn test_too_few_samples_give_single_leaf() {
        let x = array![[0.], [1.], [2.]];
        let y = array![0., 5., 1.];
        let params = ForestParams::new().check().unwrap();
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let tree = RegressionTree::grow(&x.view(), &y.view(), &params, &mut rng);
        assert_eq!(tree.depth(), 0);
        assert_abs_diff_eq!(tree.leaf(&array![1.]).mean, 2.);
    }

    #[test]
    fn test_variance_from_sums() {
        let y = array![1., 2., 3., 4.];
        let (mean, var) = mean_var(&y.view(), &[0, 1, 2, 3]);
        assert_abs_diff_eq!(mean, 2.5);
        assert_abs_diff_eq!(var, 1.25);
        assert_abs_diff_eq!(variance_from_sums(4, 10., 30.), 1.25, epsilon = 1e-12);
    }
}
