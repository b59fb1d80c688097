//! 连续相同字节的游程统计
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunLengths {
    pub max_run_length: usize,
    pub avg_run_length: f64,
}

/// 将缓冲区划分为极大游程，返回最长游程与平均游程长度；空缓冲区均为 0
pub fn run_lengths(buf: &[u8]) -> RunLengths {
    let Some((&first, rest)) = buf.split_first() else {
        return RunLengths { max_run_length: 0, avg_run_length: 0.0 };
    };

    let mut runs = 1usize;
    let mut cur = 1usize;
    let mut max = 1usize;
    let mut prev = first;
    for &b in rest {
        if b == prev {
            cur += 1;
        } else {
            max = max.max(cur);
            runs += 1;
            cur = 1;
            prev = b;
        }
    }
    max = max.max(cur);

    // 所有游程长度之和恰为缓冲区长度
    RunLengths { max_run_length: max, avg_run_length: buf.len() as f64 / runs as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        assert_eq!(run_lengths(&[]), RunLengths { max_run_length: 0, avg_run_length: 0.0 });
    }

    #[test]
    fn identical_bytes_form_one_run() {
        let r = run_lengths(&[0xAA; 17]);
        assert_eq!(r.max_run_length, 17);
        assert_eq!(r.avg_run_length, 17.0);
    }

    #[test]
    fn mixed_runs() {
        // 游程：[1,1,1] [2] [3,3] → 长度 3,1,2
        let r = run_lengths(&[1, 1, 1, 2, 3, 3]);
        assert_eq!(r.max_run_length, 3);
        assert!((r.avg_run_length - 2.0).abs() < 1e-12);
    }

    #[test]
    fn longest_run_at_tail() {
        let r = run_lengths(&[4, 5, 5, 5, 5]);
        assert_eq!(r.max_run_length, 4);
        assert!((r.avg_run_length - 2.5).abs() < 1e-12);
    }
}
