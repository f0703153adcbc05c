// Two-vehicle overtake scenario for the dynamic-game planner

use gnuplot::{AxesCommon, Caption, Color, Figure, PointSize, PointSymbol};
use rust_traffic_game::common::TrafficParticipant;
use rust_traffic_game::game_planning::GamePlanner;
use rust_traffic_game::lane::Lane;

fn main() {
    println!("Dynamic game planning start!");

    // Slow leader and a faster follower sharing the right lane, with a free
    // left lane for the overtake.
    let xs: Vec<f64> = (0..9).map(|k| 25.0 * k as f64).collect();
    let right = |x0: f64| {
        let shifted: Vec<f64> = xs.iter().map(|x| x + x0).collect();
        Lane::from_waypoints(&shifted, &vec![0.0; shifted.len()]).unwrap()
    };
    let left = |x0: f64| {
        let shifted: Vec<f64> = xs.iter().map(|x| x + x0).collect();
        Lane::from_waypoints(&shifted, &vec![3.5; shifted.len()]).unwrap()
    };

    let traffic = vec![
        TrafficParticipant::new(
            15.0,
            0.0,
            4.0,
            0.0,
            4.0,
            right(15.0),
            left(15.0),
            Lane::absent(),
        ),
        TrafficParticipant::new(0.0, 0.0, 9.0, 0.0, 9.0, right(0.0), left(0.0), Lane::absent()),
    ];

    let planner = GamePlanner::with_defaults();
    let solved = match planner.plan(&traffic) {
        Ok(solved) => solved,
        Err(e) => {
            eprintln!("planning failed: {}", e);
            return;
        }
    };

    for (i, agent) in solved.iter().enumerate() {
        let last = agent.predicted_trajectory.last().unwrap();
        println!(
            "vehicle {}: final position ({:.2}, {:.2}), speed {:.2} m/s",
            i, last.x, last.y, last.v
        );
    }

    // Plot the predicted trajectories.
    let mut fig = Figure::new();
    {
        let axes = fig
            .axes2d()
            .set_title("Dynamic game planning - predicted trajectories", &[])
            .set_x_label("x [m]", &[])
            .set_y_label("y [m]", &[])
            .set_aspect_ratio(gnuplot::AutoOption::Fix(1.0));

        let colors = ["blue", "red"];
        for (i, agent) in solved.iter().enumerate() {
            let px: Vec<f64> = agent.predicted_trajectory.iter().map(|p| p.x).collect();
            let py: Vec<f64> = agent.predicted_trajectory.iter().map(|p| p.y).collect();
            axes.lines(
                &px,
                &py,
                &[
                    Caption(&format!("vehicle {}", i)),
                    Color(colors[i % colors.len()]),
                ],
            );
            axes.points(
                &[agent.x],
                &[agent.y],
                &[Color(colors[i % colors.len()]), PointSymbol('O'), PointSize(2.0)],
            );
        }
    }

    match fig.save_to_svg("./img/overtake.svg", 800, 480) {
        Ok(_) => println!("Plot saved to ./img/overtake.svg"),
        Err(e) => eprintln!("Failed to save plot: {}", e),
    }

    println!("Done!");
}
