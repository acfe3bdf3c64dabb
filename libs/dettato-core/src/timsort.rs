//! Run-merging sort with the exact element movements of V8's
//! `Array.prototype.sort`.
//!
//! The comparator only has to answer "does `a` sort strictly before `b`";
//! it need not be a strict weak order. With an inconsistent comparator the
//! output depends on every comparison made, so run detection, minimum run
//! length, the merge pattern of the run stack and galloping thresholds all
//! follow V8 step for step.

const MIN_GALLOP: usize = 7;

#[derive(Debug, Clone, Copy)]
struct Run {
    base: usize,
    len: usize,
}

/// Why a merge stopped early.
enum Tail {
    /// One run is used up; the rest of the other is copied as is.
    Rest,
    /// A single element of the temp run is left; it goes at the far end.
    Single,
}

/// Sort `items` in place. `before(a, b)` reports whether `a` belongs
/// strictly before `b`.
pub fn sort_by<T: Copy>(items: &mut [T], before: impl Fn(&T, &T) -> bool) {
    let len = items.len();
    if len < 2 {
        return;
    }

    let mut state = MergeState {
        items,
        before,
        runs: Vec::new(),
        min_gallop: MIN_GALLOP,
    };

    let min_run = min_run_length(len);
    let mut low = 0;
    let mut remaining = len;
    while remaining != 0 {
        let mut run = state.count_and_make_run(low, low + remaining);
        if run < min_run {
            let forced = min_run.min(remaining);
            state.binary_insertion_sort(low, low + run, low + forced);
            run = forced;
        }
        state.runs.push(Run { base: low, len: run });
        state.merge_collapse();
        low += run;
        remaining -= run;
    }
    state.merge_force_collapse();
}

/// Shortest natural run worth keeping: `n` itself below 64, otherwise a
/// value in `32..=64` chosen so `n / min_run` is close to a power of two.
fn min_run_length(mut n: usize) -> usize {
    let mut r = 0;
    while n >= 64 {
        r |= n & 1;
        n >>= 1;
    }
    n + r
}

struct MergeState<'a, T, F> {
    items: &'a mut [T],
    before: F,
    runs: Vec<Run>,
    min_gallop: usize,
}

impl<T: Copy, F: Fn(&T, &T) -> bool> MergeState<'_, T, F> {
    /// Length of the natural run starting at `low`. A strictly descending
    /// run is reversed in place.
    fn count_and_make_run(&mut self, low: usize, high: usize) -> usize {
        if low + 1 == high {
            return 1;
        }
        let descending = (self.before)(&self.items[low + 1], &self.items[low]);
        let mut run = 2;
        while low + run < high
            && (self.before)(&self.items[low + run], &self.items[low + run - 1]) == descending
        {
            run += 1;
        }
        if descending {
            self.items[low..low + run].reverse();
        }
        run
    }

    /// Extend the sorted prefix `low..start` to `low..high`.
    fn binary_insertion_sort(&mut self, low: usize, start: usize, high: usize) {
        for start in start..high {
            let pivot = self.items[start];
            let (mut left, mut right) = (low, start);
            while left < right {
                let mid = left + (right - left) / 2;
                if (self.before)(&pivot, &self.items[mid]) {
                    right = mid;
                } else {
                    left = mid + 1;
                }
            }
            self.items[left..=start].rotate_right(1);
        }
    }

    fn run_invariant_holds(&self, n: usize) -> bool {
        n < 2 || self.runs[n - 2].len > self.runs[n - 1].len + self.runs[n].len
    }

    fn merge_collapse(&mut self) {
        while self.runs.len() > 1 {
            let mut n = self.runs.len() - 2;
            if !self.run_invariant_holds(n + 1) || !self.run_invariant_holds(n) {
                if self.runs[n - 1].len < self.runs[n + 1].len {
                    n -= 1;
                }
                self.merge_at(n);
            } else if self.runs[n].len <= self.runs[n + 1].len {
                self.merge_at(n);
            } else {
                break;
            }
        }
    }

    fn merge_force_collapse(&mut self) {
        while self.runs.len() > 1 {
            let mut n = self.runs.len() - 2;
            if n > 0 && self.runs[n - 1].len < self.runs[n + 1].len {
                n -= 1;
            }
            self.merge_at(n);
        }
    }

    /// Merge runs `i` and `i + 1` of the stack.
    fn merge_at(&mut self, i: usize) {
        let Run { base: base_a, len: len_a } = self.runs[i];
        let Run { base: base_b, len: len_b } = self.runs[i + 1];
        self.runs[i].len = len_a + len_b;
        self.runs.remove(i + 1);

        // Leading elements of A already in place.
        let key = self.items[base_b];
        let k = gallop_right(&self.items[base_a..base_a + len_a], &key, 0, &self.before);
        let base_a = base_a + k;
        let len_a = len_a - k;
        if len_a == 0 {
            return;
        }

        // Trailing elements of B already in place.
        let key = self.items[base_a + len_a - 1];
        let len_b = gallop_left(&self.items[base_b..base_b + len_b], &key, len_b - 1, &self.before);
        if len_b == 0 {
            return;
        }

        if len_a <= len_b {
            self.merge_low(base_a, len_a, base_b, len_b);
        } else {
            self.merge_high(base_a, len_a, base_b, len_b);
        }
    }

    /// Merge front to back, with A moved out to a temp buffer.
    fn merge_low(&mut self, base_a: usize, mut len_a: usize, base_b: usize, mut len_b: usize) {
        let temp: Vec<T> = self.items[base_a..base_a + len_a].to_vec();
        let mut dest = base_a;
        let mut cursor_temp = 0;
        let mut cursor_b = base_b;

        self.items[dest] = self.items[cursor_b];
        dest += 1;
        cursor_b += 1;

        let tail = 'merge: {
            len_b -= 1;
            if len_b == 0 {
                break 'merge Tail::Rest;
            }
            if len_a == 1 {
                break 'merge Tail::Single;
            }

            let mut min_gallop = self.min_gallop;
            loop {
                let mut wins_a = 0;
                let mut wins_b = 0;

                loop {
                    if (self.before)(&self.items[cursor_b], &temp[cursor_temp]) {
                        self.items[dest] = self.items[cursor_b];
                        dest += 1;
                        cursor_b += 1;
                        wins_b += 1;
                        len_b -= 1;
                        wins_a = 0;
                        if len_b == 0 {
                            break 'merge Tail::Rest;
                        }
                        if wins_b >= min_gallop {
                            break;
                        }
                    } else {
                        self.items[dest] = temp[cursor_temp];
                        dest += 1;
                        cursor_temp += 1;
                        wins_a += 1;
                        len_a -= 1;
                        wins_b = 0;
                        if len_a == 1 {
                            break 'merge Tail::Single;
                        }
                        if wins_a >= min_gallop {
                            break;
                        }
                    }
                }

                min_gallop += 1;
                let mut first = true;
                while wins_a >= MIN_GALLOP || wins_b >= MIN_GALLOP || first {
                    first = false;
                    min_gallop = min_gallop.saturating_sub(1).max(1);
                    self.min_gallop = min_gallop;

                    wins_a = gallop_right(
                        &temp[cursor_temp..cursor_temp + len_a],
                        &self.items[cursor_b],
                        0,
                        &self.before,
                    );
                    if wins_a > 0 {
                        self.items[dest..dest + wins_a]
                            .copy_from_slice(&temp[cursor_temp..cursor_temp + wins_a]);
                        dest += wins_a;
                        cursor_temp += wins_a;
                        len_a -= wins_a;
                        if len_a == 1 {
                            break 'merge Tail::Single;
                        }
                        if len_a == 0 {
                            break 'merge Tail::Rest;
                        }
                    }
                    self.items[dest] = self.items[cursor_b];
                    dest += 1;
                    cursor_b += 1;
                    len_b -= 1;
                    if len_b == 0 {
                        break 'merge Tail::Rest;
                    }

                    wins_b = gallop_left(
                        &self.items[cursor_b..cursor_b + len_b],
                        &temp[cursor_temp],
                        0,
                        &self.before,
                    );
                    if wins_b > 0 {
                        self.items.copy_within(cursor_b..cursor_b + wins_b, dest);
                        dest += wins_b;
                        cursor_b += wins_b;
                        len_b -= wins_b;
                        if len_b == 0 {
                            break 'merge Tail::Rest;
                        }
                    }
                    self.items[dest] = temp[cursor_temp];
                    dest += 1;
                    cursor_temp += 1;
                    len_a -= 1;
                    if len_a == 1 {
                        break 'merge Tail::Single;
                    }
                }
                min_gallop += 1;
                self.min_gallop = min_gallop;
            }
        };

        match tail {
            Tail::Rest => {
                self.items[dest..dest + len_a]
                    .copy_from_slice(&temp[cursor_temp..cursor_temp + len_a]);
            }
            Tail::Single => {
                self.items.copy_within(cursor_b..cursor_b + len_b, dest);
                self.items[dest + len_b] = temp[cursor_temp];
            }
        }
    }

    /// Merge back to front, with B moved out to a temp buffer. Cursors are
    /// exclusive ends: the next element taken from A is `a_end - 1`.
    fn merge_high(&mut self, base_a: usize, mut len_a: usize, base_b: usize, mut len_b: usize) {
        let temp: Vec<T> = self.items[base_b..base_b + len_b].to_vec();
        let mut dest_end = base_b + len_b;
        let mut temp_end = len_b;
        let mut a_end = base_a + len_a;

        dest_end -= 1;
        a_end -= 1;
        self.items[dest_end] = self.items[a_end];

        let tail = 'merge: {
            len_a -= 1;
            if len_a == 0 {
                break 'merge Tail::Rest;
            }
            if len_b == 1 {
                break 'merge Tail::Single;
            }

            let mut min_gallop = self.min_gallop;
            loop {
                let mut wins_a = 0;
                let mut wins_b = 0;

                loop {
                    if (self.before)(&temp[temp_end - 1], &self.items[a_end - 1]) {
                        dest_end -= 1;
                        a_end -= 1;
                        self.items[dest_end] = self.items[a_end];
                        wins_a += 1;
                        len_a -= 1;
                        wins_b = 0;
                        if len_a == 0 {
                            break 'merge Tail::Rest;
                        }
                        if wins_a >= min_gallop {
                            break;
                        }
                    } else {
                        dest_end -= 1;
                        temp_end -= 1;
                        self.items[dest_end] = temp[temp_end];
                        wins_b += 1;
                        len_b -= 1;
                        wins_a = 0;
                        if len_b == 1 {
                            break 'merge Tail::Single;
                        }
                        if wins_b >= min_gallop {
                            break;
                        }
                    }
                }

                min_gallop += 1;
                let mut first = true;
                while wins_a >= MIN_GALLOP || wins_b >= MIN_GALLOP || first {
                    first = false;
                    min_gallop = min_gallop.saturating_sub(1).max(1);
                    self.min_gallop = min_gallop;

                    let k = gallop_right(
                        &self.items[base_a..base_a + len_a],
                        &temp[temp_end - 1],
                        len_a - 1,
                        &self.before,
                    );
                    wins_a = len_a - k;
                    if wins_a > 0 {
                        dest_end -= wins_a;
                        a_end -= wins_a;
                        self.items.copy_within(a_end..a_end + wins_a, dest_end);
                        len_a -= wins_a;
                        if len_a == 0 {
                            break 'merge Tail::Rest;
                        }
                    }
                    dest_end -= 1;
                    temp_end -= 1;
                    self.items[dest_end] = temp[temp_end];
                    len_b -= 1;
                    if len_b == 1 {
                        break 'merge Tail::Single;
                    }

                    let k = gallop_left(&temp[..len_b], &self.items[a_end - 1], len_b - 1, &self.before);
                    wins_b = len_b - k;
                    if wins_b > 0 {
                        dest_end -= wins_b;
                        temp_end -= wins_b;
                        self.items[dest_end..dest_end + wins_b]
                            .copy_from_slice(&temp[temp_end..temp_end + wins_b]);
                        len_b -= wins_b;
                        if len_b == 1 {
                            break 'merge Tail::Single;
                        }
                        if len_b == 0 {
                            break 'merge Tail::Rest;
                        }
                    }
                    dest_end -= 1;
                    a_end -= 1;
                    self.items[dest_end] = self.items[a_end];
                    len_a -= 1;
                    if len_a == 0 {
                        break 'merge Tail::Rest;
                    }
                }
                min_gallop += 1;
                self.min_gallop = min_gallop;
            }
        };

        match tail {
            Tail::Rest => {
                self.items[dest_end - len_b..dest_end].copy_from_slice(&temp[..len_b]);
            }
            Tail::Single => {
                dest_end -= len_a;
                a_end -= len_a;
                self.items.copy_within(a_end..a_end + len_a, dest_end);
                self.items[dest_end - 1] = temp[temp_end - 1];
            }
        }
    }
}

/// Leftmost position in `run` at which `key` could be inserted: every
/// element before it sorts before `key`. The search starts from `hint`.
fn gallop_left<T>(run: &[T], key: &T, hint: usize, before: &impl Fn(&T, &T) -> bool) -> usize {
    let (mut low, mut high);
    let mut last = 0;
    let mut offset = 1;
    if before(&run[hint], key) {
        let max = run.len() - hint;
        while offset < max && before(&run[hint + offset], key) {
            last = offset;
            offset = (offset << 1) + 1;
        }
        offset = offset.min(max);
        low = hint + last + 1;
        high = hint + offset;
    } else {
        let max = hint + 1;
        while offset < max && !before(&run[hint - offset], key) {
            last = offset;
            offset = (offset << 1) + 1;
        }
        offset = offset.min(max);
        low = hint + 1 - offset;
        high = hint - last;
    }

    while low < high {
        let mid = low + (high - low) / 2;
        if before(&run[mid], key) {
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    high
}

/// Rightmost position in `run` at which `key` could be inserted: `key`
/// sorts before every element from it on. The search starts from `hint`.
fn gallop_right<T>(run: &[T], key: &T, hint: usize, before: &impl Fn(&T, &T) -> bool) -> usize {
    let (mut low, mut high);
    let mut last = 0;
    let mut offset = 1;
    if before(key, &run[hint]) {
        let max = hint + 1;
        while offset < max && before(key, &run[hint - offset]) {
            last = offset;
            offset = (offset << 1) + 1;
        }
        offset = offset.min(max);
        low = hint + 1 - offset;
        high = hint - last;
    } else {
        let max = run.len() - hint;
        while offset < max && !before(key, &run[hint + offset]) {
            last = offset;
            offset = (offset << 1) + 1;
        }
        offset = offset.min(max);
        low = hint + last + 1;
        high = hint + offset;
    }

    while low < high {
        let mid = low + (high - low) / 2;
        if before(key, &run[mid]) {
            high = mid;
        } else {
            low = mid + 1;
        }
    }
    high
}
