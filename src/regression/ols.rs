use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};

//a column is aliased when what is left of it after projecting out the
//earlier columns is smaller than this fraction of its own norm
pub const ALIAS_TOLERANCE: f64 = 1e-9;

//result of an ordinary least squares fit
#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    //one coefficient per design column, aliased columns hold 0
    pub coefficients: Array1<f64>,
    pub aliased: Vec<bool>,
    //residual sum of squares over (observations - rank)
    pub residual_variance: f64,
    pub rank: usize,
    pub observations: usize,
}

impl OlsFit {
    //coefficient of the first design column
    //for fit_with_intercept this is the regression alpha
    pub fn intercept(&self) -> f64 {
        self.coefficients[0]
    }
}

//fits y = X b by modified gram-schmidt qr with column dropping
//returns none when nothing can be estimated, when no residual degrees of freedom
//remain, or when the arithmetic produced a non-finite value
pub fn fit(design: ArrayView2<f64>, y: ArrayView1<f64>) -> Option<OlsFit> {
    let (n, k) = design.dim();
    if n == 0 || k == 0 || n != y.len() {
        return None;
    }

    let mut basis: Vec<Array1<f64>> = Vec::with_capacity(k);
    let mut kept: Vec<usize> = Vec::with_capacity(k);
    let mut aliased = vec![false; k];
    //r[[p, j]] is the weight of basis vector p in column j
    let mut r = Array2::<f64>::zeros((k, k));

    for j in 0..k {
        let column = design.column(j);
        let original_norm = column.dot(&column).sqrt();
        if !original_norm.is_finite() {
            return None;
        }

        let mut v = column.to_owned();
        //two sweeps keep the basis orthogonal when columns are nearly collinear
        for _ in 0..2 {
            for (p, q) in basis.iter().enumerate() {
                let proj = q.dot(&v);
                r[[p, j]] += proj;
                v.scaled_add(-proj, q);
            }
        }

        let norm = v.dot(&v).sqrt();
        if original_norm == 0.0 || norm <= ALIAS_TOLERANCE * original_norm {
            aliased[j] = true;
            continue;
        }

        r[[basis.len(), j]] = norm;
        v.mapv_inplace(|e| e / norm);
        basis.push(v);
        kept.push(j);
    }

    let rank = kept.len();
    if rank == 0 || n <= rank {
        return None;
    }

    let qty: Vec<f64> = basis.iter().map(|q| q.dot(&y)).collect();

    //back substitution on the upper triangle of the kept columns
    let mut solved = vec![0.0; rank];
    for p in (0..rank).rev() {
        let mut acc = qty[p];
        for m in (p + 1)..rank {
            acc -= r[[p, kept[m]]] * solved[m];
        }
        solved[p] = acc / r[[p, kept[p]]];
    }

    let mut coefficients = Array1::<f64>::zeros(k);
    for (m, &j) in kept.iter().enumerate() {
        coefficients[j] = solved[m];
    }

    let fitted = design.dot(&coefficients);
    let rss: f64 = y
        .iter()
        .zip(fitted.iter())
        .map(|(yi, fi)| (yi - fi).powi(2))
        .sum();
    let residual_variance = rss / (n - rank) as f64;

    if !residual_variance.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
        return None;
    }

    Some(OlsFit {
        coefficients,
        aliased,
        residual_variance,
        rank,
        observations: n,
    })
}

//fits with a leading column of ones, coefficient 0 is the intercept
//fails closed if the intercept itself cannot be estimated
pub fn fit_with_intercept(predictors: ArrayView2<f64>, y: ArrayView1<f64>) -> Option<OlsFit> {
    let (n, p) = predictors.dim();
    let mut design = Array2::<f64>::ones((n, p + 1));
    design.slice_mut(s![.., 1..]).assign(&predictors);

    let fit = fit(design.view(), y)?;
    if fit.aliased[0] {
        return None;
    }
    Some(fit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn recovers_exact_line() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![3.0, 5.0, 7.0, 9.0, 11.0];
        let fit = fit_with_intercept(x.view(), y.view()).unwrap();
        assert_relative_eq!(fit.intercept(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficients[1], 2.0, epsilon = 1e-10);
        assert!(fit.residual_variance < 1e-20);
        assert_eq!(fit.rank, 2);
    }

    #[test]
    fn matches_normal_equations_with_noise() {
        //closed form for simple regression: b = cov(x, y) / var(x), a = my - b mx
        let xs = [1.0, 2.0, 4.0, 7.0, 8.0, 11.0];
        let ys = [2.1, 2.9, 5.2, 7.8, 9.1, 11.7];
        let n = xs.len() as f64;
        let mx = xs.iter().sum::<f64>() / n;
        let my = ys.iter().sum::<f64>() / n;
        let sxy: f64 = xs.iter().zip(ys.iter()).map(|(x, y)| (x - mx) * (y - my)).sum();
        let sxx: f64 = xs.iter().map(|x| (x - mx).powi(2)).sum();
        let b = sxy / sxx;
        let a = my - b * mx;
        let rss: f64 = xs
            .iter()
            .zip(ys.iter())
            .map(|(x, y)| (y - a - b * x).powi(2))
            .sum();

        let x = Array2::from_shape_vec((6, 1), xs.to_vec()).unwrap();
        let y = Array1::from(ys.to_vec());
        let fit = fit_with_intercept(x.view(), y.view()).unwrap();

        assert_relative_eq!(fit.intercept(), a, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficients[1], b, epsilon = 1e-10);
        assert_relative_eq!(fit.residual_variance, rss / 4.0, epsilon = 1e-10);
    }

    #[test]
    fn duplicated_predictor_is_aliased() {
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [5.0, 10.0]];
        let y = array![1.0, 2.0, 3.0, 5.0];
        let fit = fit_with_intercept(x.view(), y.view()).unwrap();
        assert_eq!(fit.aliased, vec![false, false, true]);
        assert_eq!(fit.coefficients[2], 0.0);
        assert_relative_eq!(fit.coefficients[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn constant_predictor_is_aliased_with_intercept() {
        let x = array![[7.0], [7.0], [7.0]];
        let y = array![0.5, 0.5, 0.5];
        let fit = fit_with_intercept(x.view(), y.view()).unwrap();
        assert!(fit.aliased[1]);
        assert_relative_eq!(fit.intercept(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn no_residual_degrees_of_freedom_fails_closed() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 3.0];
        assert!(fit_with_intercept(x.view(), y.view()).is_none());
    }

    #[test]
    fn zero_intercept_column_fails_closed() {
        let design = array![[0.0, 1.0], [0.0, 2.0], [0.0, 3.0]];
        let y = array![1.0, 2.0, 3.0];
        let fit = fit(design.view(), y.view()).unwrap();
        assert!(fit.aliased[0]);
    }

    #[test]
    fn non_finite_input_fails_closed() {
        let x = array![[1.0], [f64::INFINITY], [3.0]];
        let y = array![1.0, 2.0, 3.0];
        assert!(fit_with_intercept(x.view(), y.view()).is_none());
    }

    #[test]
    fn mismatched_lengths_fail() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![1.0, 2.0];
        assert!(fit_with_intercept(x.view(), y.view()).is_none());
    }
}
