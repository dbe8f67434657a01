use plotters::prelude::*;

/// Draws target and predicted values per example index into a PNG file.
pub fn plot_comparison(
    targets: &[f64],
    predictions: &[f64],
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    // Find min and max values for y-axis scaling
    let y_min = targets
        .iter()
        .chain(predictions.iter())
        .fold(f64::INFINITY, |a, &b| a.min(b));
    let y_max = targets
        .iter()
        .chain(predictions.iter())
        .fold(f64::NEG_INFINITY, |a, &b| a.max(b));

    let mut chart = ChartBuilder::on(&root)
        .caption("Target vs Predicted", ("sans-serif", 30).into_font())
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(0..targets.len(), y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Example Index")
        .y_desc("Value")
        .draw()?;

    // Plot the target values
    chart
        .draw_series(LineSeries::new(
            targets.iter().enumerate().map(|(i, &y)| (i, y)),
            &RED,
        ))?
        .label("Target")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    // Plot the predictions
    chart
        .draw_series(LineSeries::new(
            predictions.iter().enumerate().map(|(i, &y)| (i, y)),
            &BLUE,
        ))?
        .label("Predicted")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    // Scatter points for better visibility
    chart.draw_series(PointSeries::of_element(
        targets.iter().enumerate().map(|(i, &y)| (i, y)),
        3,
        &RED,
        &|c, s, st| EmptyElement::at(c) + Circle::new((0, 0), s, st.filled()),
    ))?;

    chart.draw_series(PointSeries::of_element(
        predictions.iter().enumerate().map(|(i, &y)| (i, y)),
        3,
        &BLUE,
        &|c, s, st| EmptyElement::at(c) + Circle::new((0, 0), s, st.filled()),
    ))?;

    // Draw the legend
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    println!("Plot has been saved as '{}'", filename);

    Ok(())
}
