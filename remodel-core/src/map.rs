//! Fallible element-wise mapping.

/// Map `input` through `f`, short-circuiting on the first error.
pub fn try_map<S, D, E, F>(input: &[S], mut f: F) -> Result<Vec<D>, E>
where
    F: FnMut(&S) -> Result<D, E>,
{
    let mut out = Vec::with_capacity(input.len());
    for item in input {
        out.push(f(item)?);
    }
    Ok(out)
}
