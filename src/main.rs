use anyhow::Result;
use dh_symbolic_kinematics::jacobian::Jacobian;
use dh_symbolic_kinematics::kinematic_chain::KinematicChain;
use dh_symbolic_kinematics::parameters::dh_kinematics::Parameters;
use dh_symbolic_kinematics::utils::{dump_matrix, dump_numeric, evaluate_matrix, joint_bindings, simplify_pose};

#[cfg(feature = "allow_filesystem")]
use clap::Parser;

/// Prints the symbolic pose and Jacobian of a DH chain.
#[cfg(feature = "allow_filesystem")]
#[derive(Parser, Debug)]
#[command(version, about = "Symbolic forward kinematics and Jacobian of a DH chain")]
struct Args {
    /// YAML file with the DH table. The UR5 table is used if not given.
    file: Option<std::path::PathBuf>,

    /// Also derive the geometric Jacobian
    #[arg(long)]
    jacobian: bool,

    /// Bring all entries to the simplified normal form
    #[arg(long)]
    simplify: bool,

    /// Evaluate numerically at these joint values (radians, comma separated)
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    joints: Option<Vec<f64>>,

    /// Tool center point offset, overrides the one from the file
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    tcp: Option<Vec<f64>>,
}

#[cfg(feature = "allow_filesystem")]
fn main() -> Result<()> {
    let args = Args::parse();
    let parameters = match &args.file {
        Some(path) => Parameters::from_yaml_file(path)?,
        None => Parameters::ur5(),
    };
    println!("DH table:\n{}", parameters.to_yaml());

    let mut chain = parameters.to_chain();
    if let Some(tcp) = &args.tcp {
        chain.set_tcp_offset(tcp[0], tcp[1], tcp[2]);
    }
    report(&mut chain, args.jacobian, args.simplify, args.joints.as_deref())
}

/// Usage example.
#[cfg(not(feature = "allow_filesystem"))]
fn main() -> Result<()> {
    let mut chain = Parameters::ur5().to_chain();
    chain.set_tcp_offset(0.0, 0.0, 0.1);
    report(&mut chain, true, false, Some(&[0.0, -0.5, 0.7, 0.2, -0.3, 0.4]))
}

fn report(chain: &mut KinematicChain, with_jacobian: bool, simplify: bool, joints: Option<&[f64]>) -> Result<()> {
    let mut pose = chain.evaluate(None)?;
    if simplify {
        pose = simplify_pose(&pose);
    }
    println!("Pose ({} joints):", chain.link_count());
    dump_matrix(&pose);

    let jacobian = if with_jacobian {
        let jacobian = Jacobian::new(chain, None)?;
        println!("Jacobian:");
        if simplify {
            dump_matrix(&jacobian.simplified());
        } else {
            dump_matrix(jacobian.matrix());
        }
        Some(jacobian)
    } else {
        None
    };

    if let Some(values) = joints {
        let bindings = joint_bindings(chain.joint_variables(), values)?;
        println!("Pose at {:?}:", values);
        dump_numeric(&evaluate_matrix(&pose, &bindings)?);
        if let Some(jacobian) = jacobian {
            println!("Jacobian at {:?}:", values);
            dump_numeric(&jacobian.evaluate(&bindings)?);
        }
    }
    Ok(())
}
