use crate::artifacts::diff::line_op::LineOp;
use derive_new::new;
use std::ops::{Index, IndexMut, Range};

/// Edit distance past which the greedy trace is abandoned for the linear-space
/// bisection. The trace costs about `D²` words, so this bounds it near 8 MiB.
const MAX_TRACE_DEPTH: isize = 1024;

/// Split text into lines, keeping each line's terminator.
///
/// A final line without a terminator is kept as-is, so `"a\nb"` and `"a\nb\n"` differ.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

/// Compute a minimal edit script between two line sequences.
///
/// Changed regions come out as removals followed by additions, and the earliest
/// equal lines are matched first, so the same input always yields the same script.
pub fn compute_edit_script<S: AsRef<str>>(left: &[S], right: &[S]) -> Vec<LineOp> {
    let left = left.iter().map(AsRef::as_ref).collect::<Vec<_>>();
    let right = right.iter().map(AsRef::as_ref).collect::<Vec<_>>();

    MyersDiff::new(&left, &right)
        .diff()
        .into_iter()
        .map(|step| match step {
            Step::Equal { a, b } => LineOp::Common {
                left: left[a].to_string(),
                right: right[b].to_string(),
            },
            Step::Delete { a } => LineOp::removed(left[a]),
            Step::Insert { b } => LineOp::added(right[b]),
        })
        .collect()
}

/// A move through the edit graph, by index into the two inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Equal { a: usize, b: usize },
    Delete { a: usize },
    Insert { b: usize },
}

/// Myers' O(ND) diff.
///
/// Inputs within [`MAX_TRACE_DEPTH`] edits of each other are diffed greedily with a
/// full trace, which matches the earliest equal lines first. Anything further apart
/// is bisected on the middle snake in O(N+M) space; the script is still minimal.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct MyersDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

impl<'d, T: Eq> MyersDiff<'d, T> {
    /// `None` once the edit distance exceeds [`MAX_TRACE_DEPTH`].
    fn compute_shortest_edit(&self) -> Option<Vec<Vec<isize>>> {
        let (n, m) = (self.a.len() as isize, self.b.len() as isize);
        let offset = (n + m) as usize;

        let mut v = vec![0isize; 2 * offset + 2];
        let mut trace = Vec::new();

        for d in 0..=(n + m) {
            if d > MAX_TRACE_DEPTH {
                return None;
            }

            let lo = offset - d as usize;
            let hi = offset + d as usize;
            trace.push(v[lo..=hi].to_vec());

            for k in (-d..=d).step_by(2) {
                let idx = (offset as isize + k) as usize;

                let mut x = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
                    // came down from diagonal k+1: insertion
                    v[idx + 1]
                } else {
                    // came across from diagonal k-1: deletion
                    v[idx - 1] + 1
                };

                let mut y = x - k;
                while x < n && y < m && self.a[x as usize] == self.b[y as usize] {
                    // snake
                    x += 1;
                    y += 1;
                }

                v[idx] = x;

                if x >= n && y >= m {
                    return Some(trace);
                }
            }
        }

        Some(trace)
    }

    fn backtrack(&self, trace: Vec<Vec<isize>>) -> Vec<(isize, isize, isize, isize)> {
        let (mut x, mut y) = (self.a.len() as isize, self.b.len() as isize);
        let mut edit_path = Vec::new();

        for (d, v) in trace.iter().enumerate().rev() {
            let d = d as isize;

            if d == 0 {
                while x > 0 && y > 0 {
                    edit_path.push((x - 1, y - 1, x, y));
                    x -= 1;
                    y -= 1;
                }
                break;
            }

            // trace[d] holds diagonals -d..=d
            let at = |k: isize| v[(k + d) as usize];
            let k = x - y;

            let prev_k = if k == -d || (k != d && at(k - 1) < at(k + 1)) {
                k + 1
            } else {
                k - 1
            };

            let prev_x = at(prev_k);
            let prev_y = prev_x - prev_k;

            while x > prev_x && y > prev_y {
                edit_path.push((x - 1, y - 1, x, y));
                x -= 1;
                y -= 1;
            }

            edit_path.push((prev_x, prev_y, x, y));

            (x, y) = (prev_x, prev_y);
        }

        edit_path
    }

    fn diff_from_trace(&self, trace: Vec<Vec<isize>>) -> Vec<Step> {
        let (n, m) = (self.a.len() as isize, self.b.len() as isize);

        let mut steps = self
            .backtrack(trace)
            .into_iter()
            .filter_map(|(prev_x, prev_y, x, y)| {
                if x == prev_x {
                    (0..m)
                        .contains(&prev_y)
                        .then_some(Step::Insert { b: prev_y as usize })
                } else if y == prev_y {
                    (0..n)
                        .contains(&prev_x)
                        .then_some(Step::Delete { a: prev_x as usize })
                } else {
                    ((0..n).contains(&prev_x) && (0..m).contains(&prev_y)).then_some(
                        Step::Equal {
                            a: prev_x as usize,
                            b: prev_y as usize,
                        },
                    )
                }
            })
            .collect::<Vec<_>>();

        steps.reverse();
        steps
    }

    fn diff_in_linear_space(&self) -> Vec<Step> {
        let max_d = (self.a.len() + self.b.len()).div_ceil(2) as isize + 1;
        let mut forward = Frontier::new(max_d);
        let mut backward = Frontier::new(max_d);
        let mut steps = Vec::with_capacity(self.a.len() + self.b.len());

        self.conquer(
            0..self.a.len(),
            0..self.b.len(),
            &mut forward,
            &mut backward,
            &mut steps,
        );
        steps
    }

    fn conquer(
        &self,
        mut a: Range<usize>,
        mut b: Range<usize>,
        forward: &mut Frontier,
        backward: &mut Frontier,
        steps: &mut Vec<Step>,
    ) {
        while a.start < a.end && b.start < b.end && self.a[a.start] == self.b[b.start] {
            steps.push(Step::Equal {
                a: a.start,
                b: b.start,
            });
            a.start += 1;
            b.start += 1;
        }

        let mut suffix = 0;
        while a.start + suffix < a.end
            && b.start + suffix < b.end
            && self.a[a.end - suffix - 1] == self.b[b.end - suffix - 1]
        {
            suffix += 1;
        }
        a.end -= suffix;
        b.end -= suffix;

        let split = match (a.is_empty(), b.is_empty()) {
            (true, _) | (_, true) => None,
            _ => self
                .middle_snake(a.clone(), b.clone(), forward, backward)
                .filter(|&split| split != (a.start, b.start) && split != (a.end, b.end)),
        };

        match split {
            Some((x, y)) => {
                self.conquer(a.start..x, b.start..y, forward, backward, steps);
                self.conquer(x..a.end, y..b.end, forward, backward, steps);
            }
            None => {
                steps.extend(a.clone().map(|a| Step::Delete { a }));
                steps.extend(b.clone().map(|b| Step::Insert { b }));
            }
        }

        steps.extend((0..suffix).map(|i| Step::Equal {
            a: a.end + i,
            b: b.end + i,
        }));
    }

    /// Start of a snake on an optimal path through `a` x `b`, found by running the
    /// greedy search from both corners until the frontiers overlap.
    fn middle_snake(
        &self,
        a: Range<usize>,
        b: Range<usize>,
        forward: &mut Frontier,
        backward: &mut Frontier,
    ) -> Option<(usize, usize)> {
        let (n, m) = (a.len() as isize, b.len() as isize);
        let delta = n - m;
        let odd = delta % 2 != 0;
        let on_grid = |x: isize, y: isize| (0..=n).contains(&x) && (0..=m).contains(&y);

        forward[1] = 0;
        backward[1] = 0;

        for d in 0..=(n + m + 1) / 2 {
            for k in (-d..=d).rev().step_by(2) {
                let mut x = if k == -d || (k != d && forward[k - 1] < forward[k + 1]) {
                    forward[k + 1]
                } else {
                    forward[k - 1] + 1
                };
                let (x0, y0) = (x, x - k);
                let mut y = y0;
                while 0 <= y
                    && x < n
                    && y < m
                    && self.a[a.start + x as usize] == self.b[b.start + y as usize]
                {
                    x += 1;
                    y += 1;
                }
                forward[k] = x;

                if odd
                    && (k - delta).abs() < d
                    && forward[k] + backward[delta - k] >= n
                    && on_grid(x0, y0)
                {
                    return Some((a.start + x0 as usize, b.start + y0 as usize));
                }
            }

            for k in (-d..=d).rev().step_by(2) {
                let mut x = if k == -d || (k != d && backward[k - 1] < backward[k + 1]) {
                    backward[k + 1]
                } else {
                    backward[k - 1] + 1
                };
                let mut y = x - k;
                while 0 <= y
                    && x < n
                    && y < m
                    && self.a[a.end - 1 - x as usize] == self.b[b.end - 1 - y as usize]
                {
                    x += 1;
                    y += 1;
                }
                backward[k] = x;

                if !odd
                    && (k - delta).abs() <= d
                    && backward[k] + forward[delta - k] >= n
                    && on_grid(x, y)
                {
                    return Some((a.end - x as usize, b.end - y as usize));
                }
            }
        }

        None
    }

    pub fn diff(&self) -> Vec<Step> {
        if self.a.is_empty() && self.b.is_empty() {
            return Vec::new();
        }

        let steps = match self.compute_shortest_edit() {
            Some(trace) => self.diff_from_trace(trace),
            None => self.diff_in_linear_space(),
        };

        removals_first(steps)
    }
}

/// Furthest x reached on each diagonal `k`, indexable by negative diagonals.
struct Frontier {
    offset: isize,
    xs: Vec<isize>,
}

impl Frontier {
    fn new(max_d: isize) -> Self {
        Frontier {
            offset: max_d + 1,
            xs: vec![0; (2 * max_d + 3) as usize],
        }
    }
}

impl Index<isize> for Frontier {
    type Output = isize;

    fn index(&self, k: isize) -> &isize {
        &self.xs[(k + self.offset) as usize]
    }
}

impl IndexMut<isize> for Frontier {
    fn index_mut(&mut self, k: isize) -> &mut isize {
        &mut self.xs[(k + self.offset) as usize]
    }
}

/// Within each run of changes, deletions come before insertions.
fn removals_first(steps: Vec<Step>) -> Vec<Step> {
    let mut ordered = Vec::with_capacity(steps.len());
    let mut inserts = Vec::new();

    for step in steps {
        match step {
            Step::Delete { .. } => ordered.push(step),
            Step::Insert { .. } => inserts.push(step),
            Step::Equal { .. } => {
                ordered.append(&mut inserts);
                ordered.push(step);
            }
        }
    }
    ordered.append(&mut inserts);

    ordered
}
