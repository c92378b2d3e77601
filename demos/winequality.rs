use linfa::dataset::Records;
use linfa::prelude::ToConfusionMatrix;
use linfa::traits::{Fit, Predict};
use linfa::{Dataset, ParamGuard};
use linfa_elm::Elm;
use ndarray::Axis;

use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // everything above 6.5 is considered a good wine
    let dataset = linfa_datasets::winequality().map_targets(|x| *x > 6);

    // standardize the features, the hidden layer saturates on raw sulfur dioxide values
    let records = dataset.records();
    let mean = records.mean_axis(Axis(0)).unwrap();
    let std = records.std_axis(Axis(0), 1.0).mapv(|v| if v > 0.0 { v } else { 1.0 });
    let records = (records - &mean) / &std;
    let dataset = Dataset::new(records, dataset.targets);

    let params = Elm::params()
        .hidden_nodes(100)
        .activation_name("sigmoid")?
        .frac_test(0.1);
    let (train, valid) = params.clone().check()?.split_dataset(dataset);

    println!(
        "Fit Extreme Learning Machine with {} hidden nodes on #{} training points",
        params.check_ref()?.hidden_nodes(),
        train.nsamples()
    );

    let model = params.fit(&train)?;

    let pred = model.predict(&valid);
    let cm = pred.confusion_matrix(&valid)?;

    // Print the confusion matrix, this will print a table with four entries. On the diagonal are
    // the number of true-positive and true-negative predictions, off the diagonal are
    // false-positive and false-negative
    println!("{:?}", cm);

    println!("accuracy {}, MCC {}", cm.accuracy(), cm.mcc());

    Ok(())
}
